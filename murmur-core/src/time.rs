//! Time utilities: the wall-clock "now" that relative phrases resolve against.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Current wall-clock time in an IANA tz like "America/Chicago".
pub fn now_in_tz(tz: &str) -> Result<NaiveDateTime> {
    let tz = parse_tz(tz)?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

/// Parse a reference clock like "2026-02-20 23:59" or "2026-02-20" (noon).
pub fn parse_local_clock(local: &str) -> Result<NaiveDateTime> {
    let local = local.trim();
    if let Ok(ndt) = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M") {
        return Ok(ndt);
    }
    let date = NaiveDate::parse_from_str(local, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;
    date.and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid local datetime '{local}'"))
}

pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_local_clock_with_minutes() {
        let ndt = parse_local_clock("2026-02-20 23:59").unwrap();
        assert_eq!(ndt.to_string(), "2026-02-20 23:59:00");
    }

    #[test]
    fn test_parse_local_clock_date_only_is_noon() {
        let ndt = parse_local_clock("2026-02-20").unwrap();
        assert_eq!(ndt.hour(), 12);
    }

    #[test]
    fn test_bad_inputs() {
        assert!(parse_local_clock("yesterday").is_err());
        assert!(parse_tz("Mars/Olympus").is_err());
        assert!(now_in_tz("America/Chicago").is_ok());
    }
}
