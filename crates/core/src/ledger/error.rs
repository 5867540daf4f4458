//! Ledger state machine errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for receivable/payable lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Re-receiving an already-paid item would double-post revenue.
    #[error("Already paid; settling again would double-post")]
    AlreadyPaid,

    /// The item was cancelled; it can never settle.
    #[error("Already cancelled")]
    AlreadyCancelled,

    /// Paid items stay paid; cancellation only applies to open items.
    #[error("Cannot cancel an item that was already paid")]
    CannotCancelPaid,

    /// Payments must be strictly positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositivePayment(Decimal),

    /// Payment exceeds the remaining balance.
    #[error("Payment of {attempted} exceeds remaining balance of {remaining}")]
    Overpayment {
        /// Balance still owed before this payment.
        remaining: Decimal,
        /// Amount the caller tried to pay.
        attempted: Decimal,
    },
}
