//! Supported currency codes.
//!
//! The set is deliberately tiny: these are the currencies the app can store
//! and convert. Any other marker in a transcript is acknowledged but mapped to
//! the configured base currency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Jod,
    Inr,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Jod, Currency::Inr];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Jod => "JOD",
            Currency::Inr => "INR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Jod => "JD",
            Currency::Inr => "₹",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "JOD" => Ok(Currency::Jod),
            "INR" => Ok(Currency::Inr),
            other => Err(ConfigError::UnknownCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("jod".parse::<Currency>().unwrap(), Currency::Jod);
        assert_eq!(" INR ".parse::<Currency>().unwrap(), Currency::Inr);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Currency::Jod).unwrap();
        assert_eq!(json, "\"JOD\"");
        let back: Currency = serde_json::from_str("\"INR\"").unwrap();
        assert_eq!(back, Currency::Inr);
    }
}
