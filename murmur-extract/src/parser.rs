//! The extraction pipeline: one transcript in, one [`ParsedTransaction`] out.

use chrono::{Local, NaiveDateTime};
use murmur_core::{
    CategoryOption, Confidence, ConfigError, FieldConfidence, ParseError, ParsedTransaction,
};
use tracing::debug;

use crate::amount::extract_amount_outside;
use crate::category::CategoryMatcher;
use crate::config::ParserConfig;
use crate::date::{DatePhraseParser, RuleDateParser, resolve_date};
use crate::description::clean_description;
use crate::fuzzy::{FuzzyMatcher, LevenshteinMatcher};
use crate::kind::classify_kind;
use crate::merchant::extract_merchant;

/// Runs the five recognisers over the same text and merges their results.
///
/// Holds no per-call state; one instance can be shared across threads.
pub struct ExpenseParser {
    config: ParserConfig,
    categories: CategoryMatcher,
    dates: Box<dyn DatePhraseParser>,
    fuzzy: Box<dyn FuzzyMatcher>,
}

impl Default for ExpenseParser {
    fn default() -> Self {
        let config = ParserConfig::default();
        Self {
            categories: CategoryMatcher::from_config(&config),
            config,
            dates: Box::new(RuleDateParser),
            fuzzy: Box::new(LevenshteinMatcher::default()),
        }
    }
}

impl ExpenseParser {
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            categories: CategoryMatcher::from_config(&config),
            config,
            ..Self::default()
        })
    }

    /// Swap the date-phrase grammar.
    pub fn with_date_parser(mut self, dates: impl DatePhraseParser + 'static) -> Self {
        self.dates = Box::new(dates);
        self
    }

    /// Swap the fuzzy scorer used for category names.
    pub fn with_fuzzy_matcher(mut self, fuzzy: impl FuzzyMatcher + 'static) -> Self {
        self.fuzzy = Box::new(fuzzy);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Extract a transaction from `text`, resolving relative dates against `now`.
    ///
    /// Deterministic for equal arguments. Fails only on empty/blank text.
    pub fn parse(
        &self,
        text: &str,
        categories: &[CategoryOption],
        now: NaiveDateTime,
    ) -> Result<ParsedTransaction, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let kind = classify_kind(text);
        let date = resolve_date(self.dates.as_ref(), text, now);
        // "March 3" and "3 days ago" are not amounts
        let date_span: Vec<_> = date.iter().map(|d| d.span.clone()).collect();
        let amount = extract_amount_outside(text, self.config.base_currency, &date_span);
        let merchant = extract_merchant(text);
        let category = self
            .categories
            .match_category(self.fuzzy.as_ref(), text, categories);

        debug!(kind = %kind.kind, keyword = ?kind.keyword, "type");
        debug!(amount = ?amount.as_ref().map(|a| a.amount), marker = ?amount.as_ref().and_then(|a| a.marker.as_deref()), "amount");
        debug!(date = ?date.as_ref().map(|d| d.date), confidence = ?date.as_ref().map(|d| d.confidence), "date");
        debug!(merchant = ?merchant.as_ref().map(|m| m.name.as_str()), "merchant");
        debug!(category = ?category.as_ref().map(|c| (&c.name, c.score, &c.phase)), "category");

        let spans: Vec<_> = [
            amount.as_ref().map(|a| a.span.clone()),
            date.as_ref().map(|d| d.span.clone()),
            merchant.as_ref().map(|m| m.span.clone()),
        ]
        .into_iter()
        .flatten()
        .collect();
        let description = clean_description(text, &spans);

        let confidence = FieldConfidence {
            amount: amount.as_ref().map_or(Confidence::None, |a| a.amount_confidence),
            currency: amount.as_ref().map_or(Confidence::None, |a| a.currency_confidence),
            date: date.as_ref().map_or(Confidence::None, |d| d.confidence),
            merchant: merchant.as_ref().map_or(Confidence::None, |m| m.confidence),
            category: category.as_ref().map_or(Confidence::None, |c| c.confidence),
            description: description.confidence,
            kind: kind.confidence,
        };

        Ok(ParsedTransaction {
            kind: kind.kind,
            amount: amount.as_ref().map(|a| a.amount),
            currency: amount
                .as_ref()
                .map_or(self.config.base_currency, |a| a.currency),
            date: date.map(|d| d.date),
            merchant: merchant.map(|m| m.name),
            category_id: category.as_ref().map(|c| c.id.clone()),
            category_name: category.map(|c| c.name),
            description: description.text,
            confidence,
        })
    }
}

/// Parse with the default configuration against the local wall clock.
pub fn parse_expense_text(
    text: &str,
    categories: &[CategoryOption],
) -> Result<ParsedTransaction, ParseError> {
    ExpenseParser::default().parse(text, categories, Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DatePhrase;
    use crate::fuzzy::FuzzyHit;
    use chrono::NaiveDate;
    use murmur_core::Currency;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 18)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    struct Never;

    impl FuzzyMatcher for Never {
        fn rank(&self, _query: &str, _candidates: &[&str]) -> Vec<FuzzyHit> {
            vec![]
        }
    }

    struct FixedDate;

    impl DatePhraseParser for FixedDate {
        fn parse(&self, _text: &str, now: NaiveDateTime) -> Option<DatePhrase> {
            Some(DatePhrase {
                at: now,
                granularity: crate::date::Granularity::Month,
                span: 0..0,
                explicit_future: false,
            })
        }
    }

    #[test]
    fn test_parser_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExpenseParser>();
    }

    #[test]
    fn test_blank_is_rejected() {
        let p = ExpenseParser::default();
        assert_eq!(p.parse("", &[], now()), Err(ParseError::EmptyInput));
        assert_eq!(p.parse(" \t\n", &[], now()), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_base_currency_from_config() {
        let cfg = ParserConfig {
            base_currency: Currency::Jod,
            ..ParserConfig::default()
        };
        let p = ExpenseParser::new(cfg).unwrap();
        let tx = p.parse("falafel 3", &[], now()).unwrap();
        assert_eq!(tx.currency, Currency::Jod);
        assert_eq!(tx.confidence.currency, Confidence::Low);

        let tx = p.parse("falafel", &[], now()).unwrap();
        assert_eq!(tx.currency, Currency::Jod);
        assert_eq!(tx.confidence.currency, Confidence::None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cfg = ParserConfig {
            keyword_threshold: -0.1,
            ..ParserConfig::default()
        };
        assert!(ExpenseParser::new(cfg).is_err());
    }

    #[test]
    fn test_swapped_fuzzy_matcher_is_used() {
        let p = ExpenseParser::default().with_fuzzy_matcher(Never);
        let cats = vec![CategoryOption::new("c1", "Food")];
        let tx = p.parse("pizza 10", &cats, now()).unwrap();
        assert!(tx.category_id.is_none());
        assert_eq!(tx.confidence.category, Confidence::None);
    }

    #[test]
    fn test_swapped_date_grammar_is_used() {
        let p = ExpenseParser::default().with_date_parser(FixedDate);
        let tx = p.parse("coffee 4", &[], now()).unwrap();
        assert_eq!(tx.date, Some(now()));
        assert_eq!(tx.confidence.date, Confidence::Medium);
    }

    #[test]
    fn test_income_with_everything() {
        let cats = vec![
            CategoryOption::new("inc", "Income"),
            CategoryOption::new("food", "Food"),
        ];
        let tx = ExpenseParser::default()
            .parse("Received $1,200 salary from Acme Corp last Friday", &cats, now())
            .unwrap();
        assert!(tx.is_income());
        assert_eq!(tx.amount.unwrap().to_string(), "1200");
        assert_eq!(tx.currency, Currency::Usd);
        assert_eq!(tx.merchant.as_deref(), Some("Acme Corp"));
        assert_eq!(
            tx.date.map(|d| d.date()),
            NaiveDate::from_ymd_opt(2026, 2, 13)
        );
        assert_eq!(tx.category_id.as_deref(), Some("inc"));
        assert_eq!(tx.description, "Salary");
        assert_eq!(tx.confidence.kind, Confidence::High);
    }
}
