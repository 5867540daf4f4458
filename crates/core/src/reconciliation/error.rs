//! Reconciliation errors.

use thiserror::Error;

/// Error types for statement normalization and matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// The textual amount could not be parsed.
    #[error("Unparseable statement amount: {0:?}")]
    InvalidAmount(String),

    /// Statement lines need a description for the natural key.
    #[error("Statement line has an empty description")]
    EmptyDescription,

    /// Zero-amount lines carry no money movement to reconcile.
    #[error("Statement line has a zero amount")]
    ZeroAmount,

    /// The bank transaction was already paired.
    #[error("Bank transaction is already matched")]
    AlreadyMatched,
}
