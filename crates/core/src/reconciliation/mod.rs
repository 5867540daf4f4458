//! Bank statement normalization and matching rules.
//!
//! Imported statement lines arrive as text parsed upstream from whatever
//! format the bank exports; this module normalizes them (decimal
//! separators, signs), derives the duplicate-protection natural key, and
//! owns the matched/unmatched transition rule.

mod error;
mod parser;
mod service;
mod types;

pub use error::ReconciliationError;
pub use parser::parse_amount;
pub use service::ReconciliationService;
pub use types::{BankTransactionStatus, NormalizedLine, StatementLine};
