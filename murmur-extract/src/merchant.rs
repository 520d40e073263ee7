//! Merchant heuristic: a capitalised phrase right after "at" or "from".
//!
//! Precision over recall. Lowercase merchants are simply missed.

use std::ops::Range;

use murmur_core::Confidence;

// A dot only counts inside a word ("Amazon.com"); "Starbucks. Then" ends at the dot.
re!(re_merchant, concat!(
    r"\b(?:[Aa]t|[Ff]rom)\s+(?P<name>\p{Lu}(?:[\p{L}\p{N}'&\-]|\.[\p{L}\p{N}])*",
    r"(?:\s+(?:&\s+)?\p{Lu}(?:[\p{L}\p{N}'&\-]|\.[\p{L}\p{N}])*)*)"
));
re!(re_token, r"\S+");

/// Capitalised words that follow "at"/"from" without naming a place.
const NOT_MERCHANT: &[&str] = &[
    "today", "yesterday", "tonight", "tomorrow",
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
    "usd", "jod", "jd", "inr", "rs", "eur", "gbp", "jpy",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantMatch {
    pub name: String,
    pub confidence: Confidence,
    /// Byte range of the whole "at X" phrase
    pub span: Range<usize>,
}

fn is_noise(token: &str) -> bool {
    let word = token.trim_end_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    word.is_empty() || NOT_MERCHANT.contains(&word.as_str())
}

/// First "at/from <Capitalised Words>" phrase, minus trailing dates,
/// currency codes and punctuation.
pub fn extract_merchant(text: &str) -> Option<MerchantMatch> {
    for caps in re_merchant().captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            continue;
        };

        let mut tokens: Vec<Range<usize>> = re_token()
            .find_iter(name.as_str())
            .map(|m| (name.start() + m.start())..(name.start() + m.end()))
            .collect();
        while tokens.last().is_some_and(|t| is_noise(&text[t.clone()])) {
            tokens.pop();
        }
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            continue;
        };

        let raw = &text[first.start..last.end];
        let trimmed = raw.trim_end_matches(|c: char| matches!(c, '.' | ',' | '\'' | '-' | '&'));
        if trimmed.is_empty() {
            continue;
        }

        return Some(MerchantMatch {
            name: trimmed.to_string(),
            confidence: Confidence::High,
            span: whole.start()..(first.start + trimmed.len()),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_single_word() {
        let text = "Spent 25 dollars on pizza at Dominos yesterday";
        let m = extract_merchant(text).unwrap();
        assert_eq!(m.name, "Dominos");
        assert_eq!(m.confidence, Confidence::High);
        assert_eq!(&text[m.span], "at Dominos");
    }

    #[test]
    fn test_from_multi_word() {
        let m = extract_merchant("borrowed 40 from John Smith.").unwrap();
        assert_eq!(m.name, "John Smith");
    }

    #[test]
    fn test_trailing_weekday_and_code_dropped() {
        let m = extract_merchant("coffee at Blue Fig Friday").unwrap();
        assert_eq!(m.name, "Blue Fig");
        let m = extract_merchant("Paid at Carrefour JD 12").unwrap();
        assert_eq!(m.name, "Carrefour");
    }

    #[test]
    fn test_lowercase_is_missed() {
        assert!(extract_merchant("lunch at the cafe").is_none());
        assert!(extract_merchant("no preposition Starbucks").is_none());
    }

    #[test]
    fn test_date_only_candidate_is_skipped() {
        let m = extract_merchant("from Monday onwards, groceries from Costco").unwrap();
        assert_eq!(m.name, "Costco");
    }

    #[test]
    fn test_stops_at_sentence_end() {
        let text = "coffee at Starbucks. Then I left";
        let m = extract_merchant(text).unwrap();
        assert_eq!(m.name, "Starbucks");
        assert_eq!(&text[m.span], "at Starbucks");

        let m = extract_merchant("ordered from Amazon.com yesterday").unwrap();
        assert_eq!(m.name, "Amazon.com");
    }

    #[test]
    fn test_ampersand_joins_words() {
        let m = extract_merchant("lunch at Salt & Pepper 12").unwrap();
        assert_eq!(m.name, "Salt & Pepper");
        let m = extract_merchant("dinner at Salt & friends").unwrap();
        assert_eq!(m.name, "Salt");
    }

    #[test]
    fn test_first_match_only() {
        let m = extract_merchant("At Ikea then from Zara").unwrap();
        assert_eq!(m.name, "Ikea");
    }
}
