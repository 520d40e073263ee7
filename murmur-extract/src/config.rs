//! Tunables for the extractor. Loaded from the `[parser]` table of the CLI
//! config, but usable on its own.

use std::collections::BTreeMap;

use murmur_core::{ConfigError, Currency};
use serde::{Deserialize, Serialize};

use crate::category::CONCEPTS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Currency assumed when a transcript names none (or one we don't support)
    pub base_currency: Currency,
    /// Minimum score for a keyword concept to select a category
    pub keyword_threshold: f64,
    /// Keyword-phase score at or above which the category is `high`
    pub strong_threshold: f64,
    /// Minimum score for the raw-token fallback phase
    pub fallback_threshold: f64,
    /// Extra trigger words per concept, e.g. `food = ["mansaf", "knafeh"]`
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            base_currency: Currency::Usd,
            keyword_threshold: 0.8,
            strong_threshold: 0.95,
            fallback_threshold: 0.65,
            extra_keywords: BTreeMap::new(),
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("keyword_threshold", self.keyword_threshold),
            ("strong_threshold", self.strong_threshold),
            ("fallback_threshold", self.fallback_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.strong_threshold < self.keyword_threshold {
            return Err(ConfigError::ThresholdOrder {
                strong: self.strong_threshold,
                keyword: self.keyword_threshold,
            });
        }
        for concept in self.extra_keywords.keys() {
            if !CONCEPTS.iter().any(|c| c.name.eq_ignore_ascii_case(concept)) {
                return Err(ConfigError::UnknownConcept(concept.clone()));
            }
        }
        Ok(())
    }
}
