//! Date resolution.
//!
//! Two layers:
//! 1) a [`DatePhraseParser`] grammar that turns phrases like "last Friday" or
//!    "March 3rd" into a concrete point plus granularity, and
//! 2) [`resolve_date`], which turns that result into a [`DateMatch`] with a
//!    confidence, falling back to literal "today"/"yesterday" keywords.
//!
//! The built-in grammar is [`RuleDateParser`]. Any other grammar can be
//! plugged in through the trait.

use std::cmp::Reverse;
use std::ops::Range;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};
use murmur_core::Confidence;
use regex::Captures;

/// How precisely a phrase pins down the moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

/// Raw grammar output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePhrase {
    pub at: NaiveDateTime,
    pub granularity: Granularity,
    /// Byte range of the phrase in the input
    pub span: Range<usize>,
    /// The phrase itself points forward ("tomorrow", "next Friday").
    pub explicit_future: bool,
}

/// A date-phrase grammar: `text, now -> phrase`.
pub trait DatePhraseParser: Send + Sync {
    fn parse(&self, text: &str, now: NaiveDateTime) -> Option<DatePhrase>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub date: NaiveDateTime,
    pub confidence: Confidence,
    pub span: Range<usize>,
}

re!(re_day_keyword, r"(?i)\b(?P<w>yesterday|today)\b");

/// Resolve the date mentioned in `text` relative to `now`.
///
/// - day-level phrases are `High`
/// - week/month/year phrases are `Medium`
/// - a day after today that the phrase did not explicitly ask for is `Medium`
/// - grammar miss + literal "yesterday"/"today" keyword is `High`
pub fn resolve_date(
    grammar: &dyn DatePhraseParser,
    text: &str,
    now: NaiveDateTime,
) -> Option<DateMatch> {
    if let Some(phrase) = grammar.parse(text, now) {
        let confidence = match phrase.granularity {
            Granularity::Day if phrase.at.date() > now.date() && !phrase.explicit_future => {
                Confidence::Medium
            }
            Granularity::Day => Confidence::High,
            Granularity::Week | Granularity::Month | Granularity::Year => Confidence::Medium,
        };
        return Some(DateMatch {
            date: phrase.at,
            confidence,
            span: phrase.span,
        });
    }

    let caps = re_day_keyword().captures(text)?;
    let word = caps.name("w")?;
    let date = if word.as_str().eq_ignore_ascii_case("yesterday") {
        now.checked_sub_signed(Duration::days(1))?
    } else {
        now
    };
    Some(DateMatch {
        date,
        confidence: Confidence::High,
        span: word.range(),
    })
}

// Built-in grammar

const MONTH: &str = r"(?P<month>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

re!(re_iso, r"\b(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})\b");
re!(re_slash, r"\b(?P<m>\d{1,2})/(?P<d>\d{1,2})(?:/(?P<y>\d{4}|\d{2}))?\b");
re!(re_month_day, &format!(
    r"(?i)\b(?:on\s+)?{MONTH}\.?\s+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<y>\d{{4}})\b)?"
));
re!(re_day_month, &format!(
    r"(?i)\b(?:on\s+)?(?:the\s+)?(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}\b\.?(?:,?\s+(?P<y>\d{{4}})\b)?"
));
re!(re_month_only, &format!(
    r"(?i)\b(?:(?P<rel>in|last|this)\s+)?{MONTH}\b(?:\s+(?P<y>\d{{4}})\b)?"
));
re!(re_relative_day, concat!(
    r"(?i)\b(?P<w>(?:the\s+)?day\s+before\s+yesterday|yesterday|last\s+night|today|tonight",
    r"|this\s+(?:morning|afternoon|evening)|tomorrow)\b"
));
re!(re_ago, concat!(
    r"(?i)\b(?P<n>\d{1,4}|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+",
    r"(?P<unit>day|week|month|year)s?\s+ago\b"
));
re!(re_weekday, concat!(
    r"(?i)\b(?:(?P<rel>last|past|previous|this|next|on)\s+)?",
    r"(?P<wd>monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b"
));
re!(re_period, r"(?i)\b(?P<rel>last|past|previous|this|next)\s+(?P<unit>week|month|year)\b");

/// Regex + chrono grammar covering the phrases people actually say when
/// logging an expense: explicit calendar dates, relative days, "N days ago",
/// weekdays and last/this/next periods.
///
/// When several phrases appear, the earliest one wins; among phrases that
/// overlap it, the finest granularity and then the longest span wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleDateParser;

impl DatePhraseParser for RuleDateParser {
    fn parse(&self, text: &str, now: NaiveDateTime) -> Option<DatePhrase> {
        let mut candidates: Vec<DatePhrase> = Vec::new();

        collect(&mut candidates, re_iso().captures_iter(text), |c| iso(c, now));
        collect(&mut candidates, re_slash().captures_iter(text), |c| slashed(c, now));
        collect(&mut candidates, re_month_day().captures_iter(text), |c| month_day(c, now));
        collect(&mut candidates, re_day_month().captures_iter(text), |c| month_day(c, now));
        collect(&mut candidates, re_month_only().captures_iter(text), |c| month_only(c, now));
        collect(&mut candidates, re_relative_day().captures_iter(text), |c| relative_day(c, now));
        collect(&mut candidates, re_ago().captures_iter(text), |c| ago(c, now));
        collect(&mut candidates, re_weekday().captures_iter(text), |c| weekday(c, now));
        collect(&mut candidates, re_period().captures_iter(text), |c| period(c, now));

        let first_start = candidates.iter().map(|c| c.span.start).min()?;
        let anchor_end = candidates
            .iter()
            .filter(|c| c.span.start == first_start)
            .map(|c| c.span.end)
            .max()?;

        candidates
            .into_iter()
            .filter(|c| c.span.start < anchor_end)
            .min_by_key(|c| (c.granularity, Reverse(c.span.len()), c.span.start))
    }
}

fn collect<'t, I, F>(out: &mut Vec<DatePhrase>, matches: I, build: F)
where
    I: Iterator<Item = Captures<'t>>,
    F: Fn(&Captures<'t>) -> Option<(NaiveDateTime, Granularity, bool)>,
{
    for caps in matches {
        let Some(whole) = caps.get(0) else { continue };
        if let Some((at, granularity, explicit_future)) = build(&caps) {
            out.push(DatePhrase {
                at,
                granularity,
                span: whole.range(),
                explicit_future,
            });
        }
    }
}

type Resolved = Option<(NaiveDateTime, Granularity, bool)>;

fn noon(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(12, 0, 0)
}

fn num(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

fn month_number(s: &str) -> Option<u32> {
    let key: String = s.to_lowercase().chars().take(3).collect();
    let m = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}

fn full_year(y: u32) -> i32 {
    if y < 100 { 2000 + y as i32 } else { y as i32 }
}

/// A month/day without a year means the most recent such day, never the future.
fn yearless(month: u32, day: u32, now: NaiveDateTime) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(now.year(), month, day);
    match this_year {
        Some(d) if d <= now.date() => Some(d),
        _ => NaiveDate::from_ymd_opt(now.year() - 1, month, day),
    }
}

fn dated(month: u32, day: u32, year: Option<u32>, now: NaiveDateTime) -> Resolved {
    let date = match year {
        Some(y) => NaiveDate::from_ymd_opt(full_year(y), month, day)?,
        None => yearless(month, day, now)?,
    };
    Some((noon(date)?, Granularity::Day, false))
}

fn iso(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    dated(num(caps, "m")?, num(caps, "d")?, Some(num(caps, "y")?), now)
}

/// US order: month/day[/year]
fn slashed(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    dated(num(caps, "m")?, num(caps, "d")?, num(caps, "y"), now)
}

fn month_day(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    let month = month_number(caps.name("month")?.as_str())?;
    dated(month, num(caps, "d")?, num(caps, "y"), now)
}

fn month_only(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    let month = month_number(caps.name("month")?.as_str())?;
    let rel = caps.name("rel").map(|m| m.as_str().to_lowercase());
    let year = num(caps, "y");
    // A bare month name ("may", "mar") is too ambiguous on its own.
    if rel.is_none() && year.is_none() {
        return None;
    }

    let date = match (year, rel.as_deref()) {
        (Some(y), _) => NaiveDate::from_ymd_opt(full_year(y), month, 1)?,
        (None, Some("this")) => NaiveDate::from_ymd_opt(now.year(), month, 1)?,
        (None, Some("last")) if month >= now.month() => {
            NaiveDate::from_ymd_opt(now.year() - 1, month, 1)?
        }
        _ => yearless(month, 1, now)?,
    };
    Some((noon(date)?, Granularity::Month, false))
}

fn relative_day(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    let word = caps.name("w")?.as_str().to_lowercase();
    let word = word.split_whitespace().collect::<Vec<_>>().join(" ");
    let (offset, future) = match word.as_str() {
        "yesterday" | "last night" => (-1, false),
        "day before yesterday" | "the day before yesterday" => (-2, false),
        "tomorrow" => (1, true),
        _ => (0, false),
    };
    Some((now.checked_add_signed(Duration::days(offset))?, Granularity::Day, future))
}

fn small_number(s: &str) -> Option<u32> {
    let n = match s.to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        other => return other.parse().ok(),
    };
    Some(n)
}

fn ago(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    let n = small_number(caps.name("n")?.as_str())?;
    let unit = caps.name("unit")?.as_str().to_lowercase();
    let resolved = match unit.as_str() {
        "day" => (
            now.checked_sub_signed(Duration::days(n as i64))?,
            Granularity::Day,
        ),
        "week" => (
            now.checked_sub_signed(Duration::weeks(n as i64))?,
            Granularity::Week,
        ),
        "month" => (now.checked_sub_months(Months::new(n))?, Granularity::Month),
        _ => (
            now.checked_sub_months(Months::new(n.checked_mul(12)?))?,
            Granularity::Year,
        ),
    };
    Some((resolved.0, resolved.1, false))
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    s.to_lowercase().parse().ok()
}

fn weekday(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    let target = parse_weekday(caps.name("wd")?.as_str())?;
    let rel = caps.name("rel").map(|m| m.as_str().to_lowercase());

    let today = now.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let back = (today - wanted).rem_euclid(7);

    let (offset, future) = match rel.as_deref() {
        Some("last") | Some("previous") => (if back == 0 { -7 } else { -back }, false),
        Some("this") => (wanted - today, wanted > today),
        Some("next") => {
            let fwd = (wanted - today).rem_euclid(7);
            (if fwd == 0 { 7 } else { fwd }, true)
        }
        // bare, "on", "past": the most recent such day, today included
        _ => (-back, false),
    };
    Some((now.checked_add_signed(Duration::days(offset))?, Granularity::Day, future))
}

fn period(caps: &Captures<'_>, now: NaiveDateTime) -> Resolved {
    let rel = caps.name("rel")?.as_str().to_lowercase();
    let unit = caps.name("unit")?.as_str().to_lowercase();

    let step: i32 = match rel.as_str() {
        "next" => 1,
        "this" => 0,
        _ => -1,
    };
    let granularity = match unit.as_str() {
        "week" => Granularity::Week,
        "month" => Granularity::Month,
        _ => Granularity::Year,
    };
    let months = match granularity {
        Granularity::Month => 1,
        _ => 12,
    };

    let at = match (granularity, step) {
        (_, 0) => now,
        (Granularity::Week, s) => now.checked_add_signed(Duration::weeks(s as i64))?,
        (_, 1) => now.checked_add_months(Months::new(months))?,
        _ => now.checked_sub_months(Months::new(months))?,
    };
    Some((at, granularity, step > 0))
}
