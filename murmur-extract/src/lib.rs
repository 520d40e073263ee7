//! murmur-extract: rule-based extraction of a transaction from one sentence.
//!
//! Five recognisers run over the same immutable input and write disjoint
//! fields; [`ExpenseParser`] merges them and derives the cleaned description.
//! Nothing here touches the network or the filesystem.

// Compiled once per process, shared read-only across threads.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod amount;
pub mod category;
pub mod config;
pub mod date;
pub mod description;
pub mod fuzzy;
pub mod kind;
pub mod merchant;
pub mod parser;

pub use amount::{AmountMatch, extract_amount, extract_amount_outside};
pub use category::{CONCEPTS, CategoryMatch, CategoryMatcher, Concept, MatchPhase};
pub use config::ParserConfig;
pub use date::{DateMatch, DatePhrase, DatePhraseParser, Granularity, RuleDateParser, resolve_date};
pub use description::{CleanDescription, clean_description};
pub use fuzzy::{FuzzyHit, FuzzyMatcher, LevenshteinMatcher};
pub use kind::{KindMatch, classify_kind};
pub use merchant::{MerchantMatch, extract_merchant};
pub use parser::{ExpenseParser, parse_expense_text};
