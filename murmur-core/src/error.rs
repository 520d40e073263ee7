//! Error types for murmur

use thiserror::Error;

/// Raised by the extraction entry points.
///
/// A sub-parser finding nothing is never an error; it shows up as an absent
/// field with `Confidence::None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("transcript is empty")]
    EmptyInput,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unsupported base currency: {0}")]
    UnknownCurrency(String),

    #[error("threshold `{name}` must be within 0.0..=1.0, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("strong_threshold ({strong}) must not be below keyword_threshold ({keyword})")]
    ThresholdOrder { strong: f64, keyword: f64 },

    #[error("unknown category concept in extra_keywords: {0}")]
    UnknownConcept(String),
}
