//! Statement normalization and matching rules.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::ReconciliationError;
use super::parser::parse_amount;
use super::types::{BankTransactionStatus, NormalizedLine, StatementLine};
use crate::ledger::TransactionKind;

/// Reconciliation service for statement import and matching.
///
/// This service contains pure business logic with no database dependencies.
/// Matching is always user-confirmed; these rules only enforce the
/// one-to-one invariant and the status transition.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Normalizes one raw statement line.
    ///
    /// # Errors
    ///
    /// Rejects empty descriptions, unparseable amounts, and zero amounts.
    pub fn normalize_line(line: &StatementLine) -> Result<NormalizedLine, ReconciliationError> {
        let description = line.description.trim();
        if description.is_empty() {
            return Err(ReconciliationError::EmptyDescription);
        }

        let amount = parse_amount(&line.amount)?;
        if amount == Decimal::ZERO {
            return Err(ReconciliationError::ZeroAmount);
        }

        Ok(NormalizedLine {
            date: line.date,
            description: description.to_string(),
            amount,
        })
    }

    /// Normalizes a whole statement, dropping in-batch duplicates.
    ///
    /// Statements sometimes repeat a line when exports overlap; the first
    /// occurrence wins, judged by the natural key. Any invalid line aborts
    /// the whole import - a half-parsed statement is worse than none.
    ///
    /// # Errors
    ///
    /// Returns the first normalization error encountered.
    pub fn normalize_statement(
        lines: &[StatementLine],
    ) -> Result<Vec<NormalizedLine>, ReconciliationError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(lines.len());

        for line in lines {
            let candidate = Self::normalize_line(line)?;
            if seen.insert(candidate.natural_key()) {
                normalized.push(candidate);
            }
        }

        Ok(normalized)
    }

    /// Validates that a bank transaction can be matched.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyMatched` once the line was paired; a matched line
    /// never pairs again.
    pub fn validate_can_match(status: BankTransactionStatus) -> Result<(), ReconciliationError> {
        if status.is_matched() {
            return Err(ReconciliationError::AlreadyMatched);
        }
        Ok(())
    }

    /// Classifies a statement amount into a transaction kind.
    ///
    /// Credits (positive) materialize as revenue, debits as expense; used
    /// by create-and-match for movements with no prior system record.
    #[must_use]
    pub fn kind_for_amount(amount: Decimal) -> TransactionKind {
        if amount > Decimal::ZERO {
            TransactionKind::Revenue
        } else {
            TransactionKind::Expense
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(description: &str, amount: &str) -> StatementLine {
        StatementLine {
            date: date(2026, 2, 14),
            description: description.to_string(),
            amount: amount.to_string(),
        }
    }

    #[test]
    fn test_normalize_line_trims_and_parses() {
        let line = ReconciliationService::normalize_line(&raw("  TED RECEIVED  ", "1.250,00"))
            .unwrap();
        assert_eq!(line.description, "TED RECEIVED");
        assert_eq!(line.amount, dec!(1250.00));
    }

    #[test]
    fn test_normalize_line_rejects_empty_description() {
        assert!(matches!(
            ReconciliationService::normalize_line(&raw("   ", "10.00")),
            Err(ReconciliationError::EmptyDescription)
        ));
    }

    #[test]
    fn test_normalize_line_rejects_zero_amount() {
        assert!(matches!(
            ReconciliationService::normalize_line(&raw("FEE", "0,00")),
            Err(ReconciliationError::ZeroAmount)
        ));
    }

    #[test]
    fn test_normalize_statement_drops_in_batch_duplicates() {
        let lines = vec![
            raw("CARD SETTLEMENT", "500.00"),
            raw("CARD SETTLEMENT", "500,00"),
            raw("CARD SETTLEMENT", "250.00"),
        ];
        let normalized = ReconciliationService::normalize_statement(&lines).unwrap();
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].amount, dec!(500.00));
        assert_eq!(normalized[1].amount, dec!(250.00));
    }

    #[test]
    fn test_normalize_statement_aborts_on_invalid_line() {
        let lines = vec![raw("OK", "10.00"), raw("BROKEN", "ten")];
        assert!(matches!(
            ReconciliationService::normalize_statement(&lines),
            Err(ReconciliationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_match_transition() {
        assert!(
            ReconciliationService::validate_can_match(BankTransactionStatus::Unmatched).is_ok()
        );
        assert!(matches!(
            ReconciliationService::validate_can_match(BankTransactionStatus::Matched),
            Err(ReconciliationError::AlreadyMatched)
        ));
    }

    #[test]
    fn test_kind_follows_sign() {
        assert_eq!(
            ReconciliationService::kind_for_amount(dec!(10.00)),
            TransactionKind::Revenue
        );
        assert_eq!(
            ReconciliationService::kind_for_amount(dec!(-3.50)),
            TransactionKind::Expense
        );
    }
}
