//! Sale settlement calculation.
//!
//! Turns a completed sale into the scheduled money movements (receivables)
//! that the ledger will track to collection: installment splitting, fee
//! computation, due-date scheduling, and immediate-vs-deferred
//! classification.

mod error;
mod service;
mod types;

pub use error::SettlementError;
pub use service::SettlementCalculator;
pub use types::{
    PaymentMethod, PaymentMethodConfig, ReceivableMode, ScheduledReceivable, SettlementInput,
};
