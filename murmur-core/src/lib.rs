//! murmur-core: shared types for natural-language transaction capture

pub mod category;
pub mod confidence;
pub mod currency;
pub mod error;
pub mod time;
pub mod transaction;

pub use category::{CategoryOption, default_categories};
pub use confidence::Confidence;
pub use currency::Currency;
pub use error::{ConfigError, ParseError};
pub use transaction::{Field, FieldConfidence, ParsedTransaction, TransactionKind};
