//! Income vs expense, by keyword presence.

use murmur_core::{Confidence, TransactionKind};

re!(re_income, concat!(
    r"(?i)\b(?:payment\s+received|got\s+paid|salary|income|deposit(?:ed)?|received",
    r"|earned|bonus|refund(?:ed)?|freelance)\b"
));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindMatch {
    pub kind: TransactionKind,
    /// `High` when an income keyword fired; `Medium` for the expense default.
    pub confidence: Confidence,
    /// The income keyword that decided it, as written
    pub keyword: Option<String>,
}

pub fn classify_kind(text: &str) -> KindMatch {
    match re_income().find(text) {
        Some(m) => KindMatch {
            kind: TransactionKind::Income,
            confidence: Confidence::High,
            keyword: Some(m.as_str().to_string()),
        },
        None => KindMatch {
            kind: TransactionKind::Expense,
            confidence: Confidence::Medium,
            keyword: None,
        },
    }
}
