//! Settlement calculation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::PaymentMethod;
use fluxo_shared::types::PaymentConfigId;

/// Error types for settlement calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Sale total must be strictly positive.
    #[error("Sale total must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// Monetary amounts carry at most two decimal places.
    #[error("Sale total {0} has sub-cent precision")]
    PrecisionTooFine(Decimal),

    /// At least one installment is required.
    #[error("Installment count must be at least 1")]
    NoInstallments,

    /// Requested installment count falls outside the config's bracket.
    #[error("{requested} installments outside configured bracket {min}-{max}")]
    InstallmentsOutOfRange {
        /// Requested installment count.
        requested: u32,
        /// Bracket lower bound.
        min: u32,
        /// Bracket upper bound.
        max: u32,
    },

    /// Resolved config belongs to a different payment method.
    #[error("Config is for {config}, sale was paid with {sale}")]
    MethodMismatch {
        /// Method the config covers.
        config: PaymentMethod,
        /// Method the sale was paid with.
        sale: PaymentMethod,
    },

    /// Inactive configs cannot settle new sales.
    #[error("Payment config {0} is inactive")]
    InactiveConfig(PaymentConfigId),
}
