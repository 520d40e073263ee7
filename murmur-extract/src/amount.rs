//! Amount + currency recognition.
//!
//! Accepts "[marker]? number [marker]?" where a marker is a symbol (`$`, `₹`,
//! `€`...), a code (`USD`, `JD`, `INR`...) or a word (`dollars`, `dinars`...).
//! Only the first numeric quantity in the sentence is considered.

use std::ops::Range;
use std::str::FromStr;

use murmur_core::{Confidence, Currency};
use rust_decimal::Decimal;

re!(re_amount, concat!(
    r"(?i)(?:(?P<pre>[$€£¥₹]|\b(?:usd|jod|jd|inr|rs\.?|eur|gbp|jpy))\s?|\b)",
    r"(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)",
    r"(?:\s?(?P<post>[$€£¥₹]|(?:usd|jod|jd|inr|rs|eur|gbp|jpy|dollars?|bucks?|dinars?|rupees?|euros?|pounds?|yen)\b))?"
));

#[derive(Debug, Clone, PartialEq)]
pub struct AmountMatch {
    pub amount: Decimal,
    pub currency: Currency,
    pub amount_confidence: Confidence,
    pub currency_confidence: Confidence,
    /// The marker as written, if any ("JD", "€", "dollars")
    pub marker: Option<String>,
    /// Byte range of the whole match, markers included
    pub span: Range<usize>,
}

enum Marker {
    Known(Currency),
    Unknown,
}

fn classify_marker(raw: &str) -> Marker {
    let m = raw.trim().trim_end_matches('.').to_lowercase();
    match m.as_str() {
        "$" | "usd" | "dollar" | "dollars" | "buck" | "bucks" => Marker::Known(Currency::Usd),
        "jod" | "jd" | "dinar" | "dinars" => Marker::Known(Currency::Jod),
        "₹" | "inr" | "rs" | "rupee" | "rupees" => Marker::Known(Currency::Inr),
        _ => Marker::Unknown,
    }
}

/// A number glued to a date/time separator ("2026-02-18", "3/4", "10:30")
/// or to trailing letters ("3rd", "4x") is not a quantity.
fn is_glued(text: &str, num: &Range<usize>, has_post: bool) -> bool {
    let before = text[..num.start].chars().next_back();
    let mut after = text[num.end..].chars();
    let next = after.next();
    let next2 = after.next();

    if let Some(c) = next {
        if !has_post && c.is_alphabetic() {
            return true;
        }
        if matches!(c, '/' | '-' | ':') && next2.is_some_and(|d| d.is_ascii_digit()) {
            return true;
        }
    }
    if let Some(c) = before {
        if matches!(c, '/' | '-' | ':') {
            let prev = text[..num.start - c.len_utf8()].chars().next_back();
            if prev.is_some_and(|d| d.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

/// Find the first amount in `text`. Unmarked or unmapped amounts fall back to
/// `base`; the currency confidence says which case applied.
pub fn extract_amount(text: &str, base: Currency) -> Option<AmountMatch> {
    extract_amount_outside(text, base, &[])
}

/// Like [`extract_amount`], but numbers inside any of `skip` (e.g. the span
/// of "March 3" or "3 days ago") are not quantities.
pub fn extract_amount_outside(
    text: &str,
    base: Currency,
    skip: &[Range<usize>],
) -> Option<AmountMatch> {
    let caps = re_amount().captures_iter(text).find(|caps| {
        let num = caps.name("num").map(|m| m.range()).unwrap_or(0..0);
        let skipped = skip.iter().any(|s| num.start < s.end && s.start < num.end);
        !skipped && !is_glued(text, &num, caps.name("post").is_some())
    })?;

    let whole = caps.get(0)?;
    let raw = caps.name("num")?.as_str().replace(',', "");
    let amount = Decimal::from_str(&raw).ok()?;
    if amount.is_zero() {
        return None;
    }

    let markers: Vec<&str> = [caps.name("pre"), caps.name("post")]
        .into_iter()
        .flatten()
        .map(|m| m.as_str())
        .collect();

    let known = markers.iter().find_map(|m| match classify_marker(m) {
        Marker::Known(c) => Some((c, *m)),
        Marker::Unknown => None,
    });

    let (currency, currency_confidence, marker) = match (known, markers.first()) {
        (Some((c, m)), _) => (c, Confidence::High, Some(m.to_string())),
        (None, Some(m)) => (base, Confidence::Medium, Some(m.to_string())),
        (None, None) => (base, Confidence::Low, None),
    };

    Some(AmountMatch {
        amount: amount.abs(),
        currency,
        amount_confidence: Confidence::High,
        currency_confidence,
        marker,
        span: whole.range(),
    })
}
