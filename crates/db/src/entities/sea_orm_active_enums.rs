//! `SeaORM` active enums mapping the Postgres enum types.
//!
//! Each enum mirrors its `fluxo-core` counterpart; the `From`
//! implementations at the bottom bridge the two worlds so repositories can
//! hand core rules the values they expect.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use fluxo_core::cashier::{
    CashSessionStatus as CoreCashSessionStatus, MovementDirection as CoreMovementDirection,
};
use fluxo_core::ledger::{
    PayableStatus as CorePayableStatus, ReceivableStatus as CoreReceivableStatus,
    TransactionCategory as CoreTransactionCategory, TransactionKind as CoreTransactionKind,
};
use fluxo_core::reconciliation::BankTransactionStatus as CoreBankTransactionStatus;
use fluxo_core::settlement::{
    PaymentMethod as CorePaymentMethod, ReceivableMode as CoreReceivableMode,
};

/// Payment methods accepted at the point of sale.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Credit card.
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    /// Debit card.
    #[sea_orm(string_value = "debit_card")]
    DebitCard,
    /// Pix instant transfer.
    #[sea_orm(string_value = "pix")]
    Pix,
    /// Direct bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Bank slip (boleto).
    #[sea_orm(string_value = "bank_slip")]
    BankSlip,
}

/// Immediate or deferred receivable realization.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "receivable_mode")]
#[serde(rename_all = "lowercase")]
pub enum ReceivableMode {
    /// Realized once the liquidation window elapses.
    #[sea_orm(string_value = "immediate")]
    Immediate,
    /// Requires an explicit receive operation.
    #[sea_orm(string_value = "deferred")]
    Deferred,
}

/// Stored receivable lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "receivable_status")]
#[serde(rename_all = "lowercase")]
pub enum ReceivableStatus {
    /// Awaiting liquidation or collection.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Realized.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled with its sale.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Stored payable lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payable_status")]
#[serde(rename_all = "lowercase")]
pub enum PayableStatus {
    /// Nothing paid yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partially paid.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully paid.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Sale lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sale_status")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Sale completed and settled.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Sale cancelled; open receivables were cancelled with it.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Cash-register session status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_session_status")]
#[serde(rename_all = "lowercase")]
pub enum CashSessionStatus {
    /// Open and accepting movements.
    #[sea_orm(string_value = "open")]
    Open,
    /// Sealed by the close operation.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Direction of a manual cash movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_direction")]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Suprimento (cash in).
    #[sea_orm(string_value = "in")]
    In,
    /// Sangria (cash out).
    #[sea_orm(string_value = "out")]
    Out,
}

/// Match status of an imported bank transaction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "bank_transaction_status"
)]
#[serde(rename_all = "lowercase")]
pub enum BankTransactionStatus {
    /// Not yet paired.
    #[sea_orm(string_value = "unmatched")]
    Unmatched,
    /// Paired one-to-one with a financial transaction.
    #[sea_orm(string_value = "matched")]
    Matched,
}

/// Direction of a realized financial transaction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Money out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Category of a financial transaction or payable.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_category")]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    /// Revenue from sales settlements.
    #[sea_orm(string_value = "sales")]
    Sales,
    /// Supplier invoices.
    #[sea_orm(string_value = "supplier")]
    Supplier,
    /// Rent and occupancy.
    #[sea_orm(string_value = "rent")]
    Rent,
    /// Payroll.
    #[sea_orm(string_value = "payroll")]
    Payroll,
    /// Utilities.
    #[sea_orm(string_value = "utilities")]
    Utilities,
    /// Taxes and government fees.
    #[sea_orm(string_value = "taxes")]
    Taxes,
    /// Commission payouts.
    #[sea_orm(string_value = "commission")]
    Commission,
    /// Bank tariffs and fees.
    #[sea_orm(string_value = "bank_fees")]
    BankFees,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

// ============================================================================
// Bridges to fluxo-core enums
// ============================================================================

/// Generates `From` impls in both directions between a database enum and
/// its `fluxo-core` counterpart.
macro_rules! bridge_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

bridge_enum!(PaymentMethod <=> CorePaymentMethod {
    Cash, CreditCard, DebitCard, Pix, BankTransfer, BankSlip,
});
bridge_enum!(ReceivableMode <=> CoreReceivableMode { Immediate, Deferred });
bridge_enum!(ReceivableStatus <=> CoreReceivableStatus { Pending, Paid, Cancelled });
bridge_enum!(PayableStatus <=> CorePayableStatus { Pending, Partial, Paid, Cancelled });
bridge_enum!(CashSessionStatus <=> CoreCashSessionStatus { Open, Closed });
bridge_enum!(MovementDirection <=> CoreMovementDirection { In, Out });
bridge_enum!(BankTransactionStatus <=> CoreBankTransactionStatus { Unmatched, Matched });
bridge_enum!(TransactionKind <=> CoreTransactionKind { Revenue, Expense });
bridge_enum!(TransactionCategory <=> CoreTransactionCategory {
    Sales, Supplier, Rent, Payroll, Utilities, Taxes, Commission, BankFees, Other,
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_roundtrip_receivable_status() {
        for status in [
            CoreReceivableStatus::Pending,
            CoreReceivableStatus::Paid,
            CoreReceivableStatus::Cancelled,
        ] {
            let db: ReceivableStatus = status.into();
            let back: CoreReceivableStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_bridge_roundtrip_payment_method() {
        for method in [
            CorePaymentMethod::Cash,
            CorePaymentMethod::CreditCard,
            CorePaymentMethod::DebitCard,
            CorePaymentMethod::Pix,
            CorePaymentMethod::BankTransfer,
            CorePaymentMethod::BankSlip,
        ] {
            let db: PaymentMethod = method.into();
            let back: CorePaymentMethod = db.into();
            assert_eq!(back, method);
        }
    }
}
