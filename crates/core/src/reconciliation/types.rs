//! Reconciliation domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One raw line from an imported bank statement.
///
/// The amount is kept textual at this stage: banks disagree on decimal
/// separators and sign conventions, and normalization owns that mess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// Calendar date of the movement.
    pub date: NaiveDate,
    /// Statement description as exported.
    pub description: String,
    /// Textual amount, signed, comma or dot decimals.
    pub amount: String,
}

/// A normalized statement line ready for import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLine {
    /// Calendar date of the movement.
    pub date: NaiveDate,
    /// Trimmed description.
    pub description: String,
    /// Signed amount: positive = credit, negative = debit.
    pub amount: Decimal,
}

impl NormalizedLine {
    /// Natural key for duplicate-import protection.
    ///
    /// Together with the bank account it identifies a statement line;
    /// re-importing the same line must be a no-op.
    #[must_use]
    pub fn natural_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.date,
            self.amount.normalize(),
            self.description
        )
    }
}

/// Match status of an imported bank transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankTransactionStatus {
    /// Not yet paired with a financial transaction.
    Unmatched,
    /// Paired one-to-one with a financial transaction.
    Matched,
}

impl BankTransactionStatus {
    /// Returns true once the line was paired.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(amount: Decimal) -> NormalizedLine {
        NormalizedLine {
            date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            description: "PIX TRANSFER".to_string(),
            amount,
        }
    }

    #[test]
    fn test_natural_key_is_stable_across_scales() {
        // 45 and 45.00 are the same movement.
        assert_eq!(line(dec!(45)).natural_key(), line(dec!(45.00)).natural_key());
    }

    #[test]
    fn test_natural_key_distinguishes_amount_and_sign() {
        assert_ne!(line(dec!(45.00)).natural_key(), line(dec!(-45.00)).natural_key());
        assert_ne!(line(dec!(45.00)).natural_key(), line(dec!(45.01)).natural_key());
    }

    #[test]
    fn test_match_status() {
        assert!(!BankTransactionStatus::Unmatched.is_matched());
        assert!(BankTransactionStatus::Matched.is_matched());
    }
}
