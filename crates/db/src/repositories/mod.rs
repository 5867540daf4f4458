//! Repository abstractions for data access.
//!
//! Repositories own the transactional boundaries: every money-touching
//! mutation runs as a single database transaction, and the reads that feed
//! a dependent write happen inside the same transaction.

pub mod bank;
pub mod cash_session;
pub mod financial_transaction;
pub mod payable;
pub mod payment_config;
pub mod receivable;
pub mod settlement;

pub use bank::{BankError, BankRepository, CreateAndMatchInput, ImportOutcome};
pub use cash_session::{CashSessionError, CashSessionRepository, SessionReport};
pub use financial_transaction::{
    FinancialTransactionRepository, TransactionError, TransactionFilter,
};
pub use payable::{
    CreatePayableInput, PayPayableInput, PayableError, PayableFilter, PayableRepository,
};
pub use payment_config::{CreatePaymentConfigInput, PaymentConfigError, PaymentConfigRepository};
pub use receivable::{ReceivableError, ReceivableFilter, ReceivableRepository};
pub use settlement::{
    CreateSettlementInput, SettlementError, SettlementRepository, SettlementResult,
};

use fluxo_core::cashier::CashierError;
use fluxo_core::ledger::LedgerError;
use fluxo_core::reconciliation::ReconciliationError;
use fluxo_shared::AppError;

// ============================================================================
// AppError conversions
// ============================================================================
//
// Every repository error classifies into the application taxonomy here, so
// the API layer maps one type to HTTP responses.

fn ledger_to_app(error: &LedgerError) -> AppError {
    match error {
        LedgerError::AlreadyPaid
        | LedgerError::AlreadyCancelled
        | LedgerError::CannotCancelPaid => AppError::Conflict(error.to_string()),
        LedgerError::NonPositivePayment(_) | LedgerError::Overpayment { .. } => {
            AppError::Validation(error.to_string())
        }
    }
}

fn cashier_to_app(error: &CashierError) -> AppError {
    match error {
        CashierError::SessionClosed => AppError::Conflict(error.to_string()),
        CashierError::NonPositiveAmount(_) | CashierError::NegativeOpeningBalance(_) => {
            AppError::Validation(error.to_string())
        }
    }
}

fn reconciliation_to_app(error: &ReconciliationError) -> AppError {
    match error {
        ReconciliationError::AlreadyMatched => AppError::Conflict(error.to_string()),
        ReconciliationError::InvalidAmount(_)
        | ReconciliationError::EmptyDescription
        | ReconciliationError::ZeroAmount => AppError::Validation(error.to_string()),
    }
}

impl From<PaymentConfigError> for AppError {
    fn from(error: PaymentConfigError) -> Self {
        match &error {
            PaymentConfigError::NotFound(_) => Self::NotFound(error.to_string()),
            PaymentConfigError::Inactive(_) => Self::Configuration(error.to_string()),
            PaymentConfigError::InvalidBracket { .. } | PaymentConfigError::NegativeFee(_) => {
                Self::Validation(error.to_string())
            }
            PaymentConfigError::Database(_) => Self::Database(error.to_string()),
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(error: SettlementError) -> Self {
        match &error {
            // The sale settlement aborts when no usable config resolves;
            // the caller must fix configuration, not retry.
            SettlementError::Config(_) => Self::Configuration(error.to_string()),
            SettlementError::Calculation(_) => Self::Validation(error.to_string()),
            SettlementError::SaleNotFound(_) | SettlementError::BankAccountNotFound(_) => {
                Self::NotFound(error.to_string())
            }
            SettlementError::SaleAlreadyCancelled(_)
            | SettlementError::ConcurrentModification(_) => Self::Conflict(error.to_string()),
            SettlementError::Database(_) => Self::Database(error.to_string()),
        }
    }
}

impl From<ReceivableError> for AppError {
    fn from(error: ReceivableError) -> Self {
        match &error {
            ReceivableError::NotFound(_) => Self::NotFound(error.to_string()),
            ReceivableError::Lifecycle(inner) => ledger_to_app(inner),
            ReceivableError::ConcurrentModification(_) => Self::Conflict(error.to_string()),
            ReceivableError::Posting(inner) => match inner {
                SettlementError::Database(_) => Self::Database(error.to_string()),
                _ => Self::Conflict(error.to_string()),
            },
            ReceivableError::Database(_) => Self::Database(error.to_string()),
        }
    }
}

impl From<PayableError> for AppError {
    fn from(error: PayableError) -> Self {
        match &error {
            PayableError::NotFound(_) | PayableError::BankAccountNotFound(_) => {
                Self::NotFound(error.to_string())
            }
            PayableError::Lifecycle(inner) => ledger_to_app(inner),
            PayableError::NonPositiveAmount(_) => Self::Validation(error.to_string()),
            PayableError::ConcurrentModification(_) => Self::Conflict(error.to_string()),
            PayableError::Database(_) => Self::Database(error.to_string()),
        }
    }
}

impl From<CashSessionError> for AppError {
    fn from(error: CashSessionError) -> Self {
        match &error {
            CashSessionError::NotFound(_) => Self::NotFound(error.to_string()),
            CashSessionError::TerminalBusy(_) => Self::Conflict(error.to_string()),
            CashSessionError::Cashier(inner) => cashier_to_app(inner),
            CashSessionError::Database(_) => Self::Database(error.to_string()),
        }
    }
}

impl From<BankError> for AppError {
    fn from(error: BankError) -> Self {
        match &error {
            BankError::AccountNotFound(_)
            | BankError::TransactionNotFound(_)
            | BankError::FinancialTransactionNotFound(_) => Self::NotFound(error.to_string()),
            BankError::TargetAlreadyMatched(_) => Self::Conflict(error.to_string()),
            BankError::Reconciliation(inner) => reconciliation_to_app(inner),
            BankError::Database(_) => Self::Database(error.to_string()),
        }
    }
}

impl From<TransactionError> for AppError {
    fn from(error: TransactionError) -> Self {
        match &error {
            TransactionError::NotFound(_) => Self::NotFound(error.to_string()),
            TransactionError::Database(_) => Self::Database(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_double_settlement_maps_to_conflict() {
        let app: AppError = ReceivableError::Lifecycle(LedgerError::AlreadyPaid).into();
        assert_eq!(app.status_code(), 409);
    }

    #[test]
    fn test_overpayment_maps_to_validation() {
        let app: AppError = PayableError::Lifecycle(LedgerError::Overpayment {
            remaining: dec!(10.00),
            attempted: dec!(20.00),
        })
        .into();
        assert_eq!(app.status_code(), 400);
    }

    #[test]
    fn test_terminal_busy_maps_to_conflict() {
        let app: AppError = CashSessionError::TerminalBusy(Uuid::new_v4()).into();
        assert_eq!(app.status_code(), 409);
    }

    #[test]
    fn test_missing_config_maps_to_configuration() {
        let app: AppError =
            SettlementError::Config(PaymentConfigError::Inactive(Uuid::new_v4())).into();
        assert_eq!(app.status_code(), 422);
        assert_eq!(app.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_already_matched_maps_to_conflict() {
        let app: AppError = BankError::Reconciliation(ReconciliationError::AlreadyMatched).into();
        assert_eq!(app.status_code(), 409);
    }

    #[test]
    fn test_unknown_ids_map_to_not_found() {
        let id = Uuid::new_v4();
        assert_eq!(AppError::from(ReceivableError::NotFound(id)).status_code(), 404);
        assert_eq!(AppError::from(PayableError::NotFound(id)).status_code(), 404);
        assert_eq!(AppError::from(BankError::AccountNotFound(id)).status_code(), 404);
        assert_eq!(
            AppError::from(TransactionError::NotFound(id)).status_code(),
            404
        );
    }
}
