//! Derive a short human description by cutting out what the other
//! recognisers already captured.

use std::ops::Range;

use murmur_core::Confidence;

re!(re_leading_verb, r"(?i)^(?:spent|paid|bought|received|earned|got)\b");
re!(re_leading_connector, r"(?i)^(?:on|for)\b");
re!(re_trailing_connector, r"(?i)\b(?:on|for)$");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanDescription {
    pub text: String,
    /// `High` when cleaning left something; `Low` when it fell back to the raw input
    pub confidence: Confidence,
}

/// Single spaces, punctuation-only leftovers dropped. A lone "&" survives
/// between two words ("fish & chips").
fn collapse(s: &str) -> String {
    let mut words: Vec<&str> = s
        .split_whitespace()
        .filter(|w| *w == "&" || w.chars().any(|c| c.is_alphanumeric()))
        .collect();
    words.dedup_by(|b, a| *a == "&" && *b == "&");
    while words.first() == Some(&"&") {
        words.remove(0);
    }
    while words.last() == Some(&"&") {
        words.pop();
    }
    words.join(" ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace every span with a space; spans may overlap or be unsorted.
fn cut(text: &str, spans: &[Range<usize>]) -> String {
    let mut sorted: Vec<Range<usize>> = spans
        .iter()
        .filter(|r| r.start < r.end && r.end <= text.len())
        .cloned()
        .collect();
    sorted.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for span in sorted {
        if span.end <= pos {
            continue;
        }
        let start = span.start.max(pos);
        if let Some(kept) = text.get(pos..start) {
            out.push_str(kept);
        }
        out.push(' ');
        pos = span.end;
    }
    if let Some(rest) = text.get(pos..) {
        out.push_str(rest);
    }
    out
}

fn strip_leading(re: &regex::Regex, s: String) -> String {
    let mut s = s;
    while let Some(m) = re.find(&s) {
        s = s[m.end()..].trim_start().to_string();
    }
    s
}

fn strip_trailing(re: &regex::Regex, s: String) -> String {
    let mut s = s;
    while let Some(m) = re.find(&s) {
        s = s[..m.start()].trim_end().to_string();
    }
    s
}

/// Remove the recognised `spans` plus leading action verbs and any dangling
/// "on"/"for" at either end, collapse whitespace and capitalise.
///
/// Falls back to the trimmed raw input (`Low`) if nothing survives.
pub fn clean_description(text: &str, spans: &[Range<usize>]) -> CleanDescription {
    let remaining = collapse(&cut(text, spans));
    let remaining = strip_leading(re_leading_verb(), remaining);
    let remaining = strip_leading(re_leading_connector(), remaining);
    let remaining = strip_trailing(re_trailing_connector(), remaining);
    let remaining = remaining
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '!' | '-'))
        .to_string();

    if remaining.is_empty() {
        return CleanDescription {
            text: text.trim().to_string(),
            confidence: Confidence::Low,
        };
    }
    CleanDescription {
        text: capitalize(&remaining),
        confidence: Confidence::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_sentence() {
        let text = "Spent 25 dollars on pizza at Dominos yesterday";
        // "25 dollars", "at Dominos", "yesterday"
        let d = clean_description(text, &[6..16, 26..36, 37..46]);
        assert_eq!(d.text, "Pizza");
        assert_eq!(d.confidence, Confidence::High);
    }

    #[test]
    fn test_stacked_verbs() {
        let d = clean_description("got paid salary", &[]);
        assert_eq!(d.text, "Salary");
    }

    #[test]
    fn test_overlapping_and_unsorted_spans() {
        let text = "Paid 15 JD for taxi from Amman";
        let d = clean_description(text, &[20..30, 5..10, 7..10]);
        assert_eq!(d.text, "Taxi");
    }

    #[test]
    fn test_punctuation_left_behind_is_dropped() {
        let text = "lunch, 12 dollars.";
        let d = clean_description(text, &[7..17]);
        assert_eq!(d.text, "Lunch");
    }

    #[test]
    fn test_trailing_connector_dropped() {
        let text = "bought shoes at Zara for €80 last Saturday";
        // "at Zara", "€80", "last Saturday"
        let d = clean_description(text, &[13..20, 25..30, 31..44]);
        assert_eq!(d.text, "Shoes");

        let d = clean_description("electricity bill on", &[]);
        assert_eq!(d.text, "Electricity bill");
        let d = clean_description("a coupon", &[]);
        assert_eq!(d.text, "A coupon");
    }

    #[test]
    fn test_ampersand_between_words_kept() {
        let d = clean_description("fish & chips", &[]);
        assert_eq!(d.text, "Fish & chips");

        let text = "lunch at Salt & Pepper 12";
        let d = clean_description(text, &[6..22, 23..25]);
        assert_eq!(d.text, "Lunch");

        let d = clean_description("& tea &", &[]);
        assert_eq!(d.text, "Tea");
    }

    #[test]
    fn test_fallback_when_nothing_left() {
        let d = clean_description("  42 ", &[2..4]);
        assert_eq!(d.text, "42");
        assert_eq!(d.confidence, Confidence::Low);

        let d = clean_description("Spent", &[]);
        assert_eq!(d.text, "Spent");
        assert_eq!(d.confidence, Confidence::Low);
    }

    #[test]
    fn test_verbs_only_stripped_at_start() {
        let d = clean_description("refund for shoes I bought", &[]);
        assert_eq!(d.text, "Refund for shoes I bought");
    }

    #[test]
    fn test_unicode_capitalization() {
        let d = clean_description("élan café", &[]);
        assert_eq!(d.text, "Élan café");
    }
}
