//! Caller-owned category references and the seed taxonomy new users start with.

use serde::{Deserialize, Serialize};

/// One entry of the user's category list.
///
/// `id` is opaque to the extractor; `name` is what gets matched
/// (case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
}

impl CategoryOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Categories every account is seeded with.
const DEFAULT_CATEGORY_NAMES: [&str; 11] = [
    "Food",
    "Transport",
    "Shopping",
    "Entertainment",
    "Health",
    "Bills",
    "Education",
    "Travel",
    "Housing",
    "Groceries",
    "Income",
];

/// The default category set with lowercase slug ids (`"food"`, `"transport"`, ...).
pub fn default_categories() -> Vec<CategoryOption> {
    DEFAULT_CATEGORY_NAMES
        .iter()
        .map(|name| CategoryOption::new(name.to_lowercase(), *name))
        .collect()
}
