//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stored lifecycle status of a receivable.
///
/// `pending -> {paid, cancelled}`. Overdue is never stored; it is derived
/// at read time (see [`DerivedReceivableStatus`]) so list and detail views
/// cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivableStatus {
    /// Awaiting liquidation or explicit collection.
    Pending,
    /// Realized; a financial transaction has been posted.
    Paid,
    /// Cancelled along with its sale; no posting ever happens.
    Cancelled,
}

impl ReceivableStatus {
    /// Returns true if the receivable reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

/// Read-time receivable status, with overdue derived from the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedReceivableStatus {
    /// Pending, due date not yet reached.
    Pending,
    /// Pending, due date in the past.
    Overdue,
    /// Realized.
    Paid,
    /// Cancelled.
    Cancelled,
}

/// Stored lifecycle status of a payable.
///
/// `pending -> partial -> paid`, or `pending -> cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayableStatus {
    /// Nothing paid yet.
    Pending,
    /// Partially paid; `total_paid` tracks the running amount.
    Partial,
    /// Fully paid.
    Paid,
    /// Cancelled; no further payments accepted.
    Cancelled,
}

impl PayableStatus {
    /// Returns true if the payable reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

/// Read-time payable status, with overdue derived from the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedPayableStatus {
    /// Nothing paid, due date not reached.
    Pending,
    /// Partially paid.
    Partial,
    /// Open (pending or partial) past the due date.
    Overdue,
    /// Fully paid.
    Paid,
    /// Cancelled.
    Cancelled,
}

/// Direction of a realized financial transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (settled receivables, matched credits).
    Revenue,
    /// Money going out (paid payables, matched debits).
    Expense,
}

/// Category of a financial transaction or payable.
///
/// A closed enumeration so cash-flow reporting never has to bucket
/// free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    /// Revenue from sales settlements.
    Sales,
    /// Supplier invoices.
    Supplier,
    /// Rent and occupancy.
    Rent,
    /// Salaries and commissions payroll.
    Payroll,
    /// Utilities (power, water, telecom).
    Utilities,
    /// Taxes and government fees.
    Taxes,
    /// Commission payouts to staff.
    Commission,
    /// Bank tariffs and statement fees.
    BankFees,
    /// Anything else.
    Other,
}

/// Result of applying a payment to a payable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Running total paid after this payment.
    pub total_paid: Decimal,
    /// New payable status (`Paid` when the balance is cleared).
    pub status: PayableStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receivable_terminal_states() {
        assert!(!ReceivableStatus::Pending.is_terminal());
        assert!(ReceivableStatus::Paid.is_terminal());
        assert!(ReceivableStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_payable_terminal_states() {
        assert!(!PayableStatus::Pending.is_terminal());
        assert!(!PayableStatus::Partial.is_terminal());
        assert!(PayableStatus::Paid.is_terminal());
        assert!(PayableStatus::Cancelled.is_terminal());
    }
}
