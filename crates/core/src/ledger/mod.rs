//! Receivable/payable lifecycle state machine.
//!
//! Owns the rules for settling, cancelling, and paying scheduled money
//! movements, plus the lazy auto-settlement eligibility rule. Persistence
//! and atomicity live in the repository layer; everything here is pure.

mod error;
mod service;
mod types;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    DerivedPayableStatus, DerivedReceivableStatus, PayableStatus, PaymentOutcome,
    ReceivableStatus, TransactionCategory, TransactionKind,
};
