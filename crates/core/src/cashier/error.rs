//! Cash-register session errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for cash-register session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CashierError {
    /// Movements and close only apply to open sessions.
    #[error("Session is closed")]
    SessionClosed,

    /// Sangria and suprimento amounts must be strictly positive.
    #[error("Movement amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A drawer cannot open owing money.
    #[error("Opening balance cannot be negative, got {0}")]
    NegativeOpeningBalance(Decimal),
}
