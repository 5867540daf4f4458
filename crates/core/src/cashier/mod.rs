//! Cash-register session arithmetic.
//!
//! Session open/close rules, sangria/suprimento validation, and the
//! expected-balance computation compared against the physically counted
//! closing figure.

mod error;
mod service;
mod types;

pub use error::CashierError;
pub use service::CashierService;
pub use types::{BalanceBreakdown, CashSessionStatus, MovementDirection};
