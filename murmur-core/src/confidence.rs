//! Coarse trust ratings attached to every extracted field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much the caller should trust an unreviewed value.
///
/// Ordered from weakest to strongest so `max`/comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn is_none(&self) -> bool {
        *self == Confidence::None
    }

    /// Values at or below `Low` must be surfaced to the user before saving.
    pub fn needs_review(&self) -> bool {
        *self <= Confidence::Low
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::None => "none",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
