//! The structured record produced from one transcript.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::confidence::Confidence;
use crate::currency::Currency;

/// Money in or money out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Expense => f.write_str("expense"),
            TransactionKind::Income => f.write_str("income"),
        }
    }
}

/// Names of the rated fields, used when reporting what needs review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Amount,
    Currency,
    Date,
    Merchant,
    Category,
    Description,
    #[serde(rename = "type")]
    Kind,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Amount => "amount",
            Field::Currency => "currency",
            Field::Date => "date",
            Field::Merchant => "merchant",
            Field::Category => "category",
            Field::Description => "description",
            Field::Kind => "type",
        };
        f.write_str(s)
    }
}

/// One confidence per extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldConfidence {
    pub amount: Confidence,
    pub currency: Confidence,
    pub date: Confidence,
    pub merchant: Confidence,
    pub category: Confidence,
    pub description: Confidence,
    #[serde(rename = "type")]
    pub kind: Confidence,
}

impl FieldConfidence {
    pub fn get(&self, field: Field) -> Confidence {
        match field {
            Field::Amount => self.amount,
            Field::Currency => self.currency,
            Field::Date => self.date,
            Field::Merchant => self.merchant,
            Field::Category => self.category,
            Field::Description => self.description,
            Field::Kind => self.kind,
        }
    }

    /// Fields rated `low` or `none`, in display order.
    pub fn flagged(&self) -> Vec<Field> {
        [
            Field::Kind,
            Field::Amount,
            Field::Currency,
            Field::Date,
            Field::Merchant,
            Field::Category,
            Field::Description,
        ]
        .into_iter()
        .filter(|f| self.get(*f).needs_review())
        .collect()
    }
}

/// Output of the extractor. Transient: the caller reviews it, then either
/// persists its own expense record or drops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Option<Decimal>,
    /// Holds the base currency when nothing was stated; check `confidence.currency`.
    pub currency: Currency,
    pub date: Option<NaiveDateTime>,
    pub merchant: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    /// Never empty
    pub description: String,
    pub confidence: FieldConfidence,
}

impl ParsedTransaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// The stated date, or `now` when the transcript carried none.
    pub fn date_or(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.date.unwrap_or(now)
    }

    /// True when the record must not be saved without the user looking at it:
    /// no amount, or any recognised field rated `low`.
    pub fn needs_review(&self) -> bool {
        self.amount.is_none()
            || self
                .confidence
                .flagged()
                .into_iter()
                .any(|f| self.confidence.get(f) == Confidence::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> ParsedTransaction {
        ParsedTransaction {
            kind: TransactionKind::Expense,
            amount: Some(Decimal::new(1250, 2)),
            currency: Currency::Usd,
            date: None,
            merchant: Some("Dominos".to_string()),
            category_id: None,
            category_name: None,
            description: "Pizza".to_string(),
            confidence: FieldConfidence {
                amount: Confidence::High,
                currency: Confidence::Low,
                merchant: Confidence::High,
                description: Confidence::High,
                kind: Confidence::Medium,
                ..FieldConfidence::default()
            },
        }
    }

    #[test]
    fn test_flagged_fields() {
        let tx = sample();
        assert_eq!(
            tx.confidence.flagged(),
            vec![Field::Currency, Field::Date, Field::Category]
        );
        assert!(tx.needs_review());
    }

    #[test]
    fn test_date_or_defaults_to_now() {
        let now = NaiveDate::from_ymd_opt(2026, 2, 18)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(sample().date_or(now), now);
    }

    #[test]
    fn test_json_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], "12.50");
        assert_eq!(json["currency"], "USD");
        assert!(json["categoryId"].is_null());
        assert_eq!(json["confidence"]["currency"], "low");
        assert_eq!(json["confidence"]["type"], "medium");
    }
}
