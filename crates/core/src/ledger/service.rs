//! Ledger lifecycle rules.
//!
//! Pure transition validation and payment arithmetic for receivables and
//! payables, plus the lazy auto-settlement eligibility rule invoked by the
//! listing path.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{
    DerivedPayableStatus, DerivedReceivableStatus, PayableStatus, PaymentOutcome, ReceivableStatus,
};
use crate::settlement::ReceivableMode;

/// Ledger service for lifecycle validation and payment arithmetic.
///
/// This service contains pure business logic with no database dependencies.
/// Repositories call these rules inside their transactions.
pub struct LedgerService;

impl LedgerService {
    /// Validates that a receivable can be received (settled).
    ///
    /// Valid only from `pending` (overdue is the same stored state).
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPaid` or `AlreadyCancelled` for terminal states, so
    /// a double-receive is a conflict rather than a double-post.
    pub fn validate_can_receive(status: ReceivableStatus) -> Result<(), LedgerError> {
        match status {
            ReceivableStatus::Pending => Ok(()),
            ReceivableStatus::Paid => Err(LedgerError::AlreadyPaid),
            ReceivableStatus::Cancelled => Err(LedgerError::AlreadyCancelled),
        }
    }

    /// Validates that a receivable can be cancelled.
    ///
    /// Valid only from `pending`; paid items are history and stay paid.
    ///
    /// # Errors
    ///
    /// Returns `CannotCancelPaid` or `AlreadyCancelled`.
    pub fn validate_can_cancel(status: ReceivableStatus) -> Result<(), LedgerError> {
        match status {
            ReceivableStatus::Pending => Ok(()),
            ReceivableStatus::Paid => Err(LedgerError::CannotCancelPaid),
            ReceivableStatus::Cancelled => Err(LedgerError::AlreadyCancelled),
        }
    }

    /// Validates that a payable can accept a payment.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPaid` or `AlreadyCancelled` for terminal states.
    pub fn validate_can_pay(status: PayableStatus) -> Result<(), LedgerError> {
        match status {
            PayableStatus::Pending | PayableStatus::Partial => Ok(()),
            PayableStatus::Paid => Err(LedgerError::AlreadyPaid),
            PayableStatus::Cancelled => Err(LedgerError::AlreadyCancelled),
        }
    }

    /// Applies a payment to a payable balance.
    ///
    /// Increments `total_paid`; the payable becomes `paid` when the balance
    /// is cleared, `partial` otherwise.
    ///
    /// # Errors
    ///
    /// Rejects non-positive payments and payments beyond the remaining
    /// balance before anything is mutated.
    pub fn apply_payment(
        amount: Decimal,
        total_paid: Decimal,
        amount_paid: Decimal,
    ) -> Result<PaymentOutcome, LedgerError> {
        if amount_paid <= Decimal::ZERO {
            return Err(LedgerError::NonPositivePayment(amount_paid));
        }

        let remaining = amount - total_paid;
        if amount_paid > remaining {
            return Err(LedgerError::Overpayment {
                remaining,
                attempted: amount_paid,
            });
        }

        let new_total = total_paid + amount_paid;
        let status = if new_total >= amount {
            PayableStatus::Paid
        } else {
            PayableStatus::Partial
        };

        Ok(PaymentOutcome {
            total_paid: new_total,
            status,
        })
    }

    /// Lazy auto-settlement eligibility.
    ///
    /// A pending receivable settles as a side effect of being listed once
    /// its due date is reached, but only when its originating config is
    /// immediate mode. Items whose config reference was nulled (config
    /// deleted) keep waiting for an explicit receive; their liquidation
    /// mode is no longer known.
    #[must_use]
    pub fn should_auto_settle(
        mode: Option<ReceivableMode>,
        status: ReceivableStatus,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> bool {
        status == ReceivableStatus::Pending
            && mode == Some(ReceivableMode::Immediate)
            && due_date <= today
    }

    /// Derives the read-time receivable status, computing overdue from the
    /// due date.
    #[must_use]
    pub fn derived_receivable_status(
        status: ReceivableStatus,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> DerivedReceivableStatus {
        match status {
            ReceivableStatus::Paid => DerivedReceivableStatus::Paid,
            ReceivableStatus::Cancelled => DerivedReceivableStatus::Cancelled,
            ReceivableStatus::Pending => {
                if due_date < today {
                    DerivedReceivableStatus::Overdue
                } else {
                    DerivedReceivableStatus::Pending
                }
            }
        }
    }

    /// Derives the read-time payable status, computing overdue from the
    /// due date.
    #[must_use]
    pub fn derived_payable_status(
        status: PayableStatus,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> DerivedPayableStatus {
        match status {
            PayableStatus::Paid => DerivedPayableStatus::Paid,
            PayableStatus::Cancelled => DerivedPayableStatus::Cancelled,
            PayableStatus::Pending | PayableStatus::Partial if due_date < today => {
                DerivedPayableStatus::Overdue
            }
            PayableStatus::Pending => DerivedPayableStatus::Pending,
            PayableStatus::Partial => DerivedPayableStatus::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_can_receive_only_pending() {
        assert!(LedgerService::validate_can_receive(ReceivableStatus::Pending).is_ok());
        assert!(matches!(
            LedgerService::validate_can_receive(ReceivableStatus::Paid),
            Err(LedgerError::AlreadyPaid)
        ));
        assert!(matches!(
            LedgerService::validate_can_receive(ReceivableStatus::Cancelled),
            Err(LedgerError::AlreadyCancelled)
        ));
    }

    #[test]
    fn test_can_cancel_only_pending() {
        assert!(LedgerService::validate_can_cancel(ReceivableStatus::Pending).is_ok());
        assert!(matches!(
            LedgerService::validate_can_cancel(ReceivableStatus::Paid),
            Err(LedgerError::CannotCancelPaid)
        ));
        assert!(matches!(
            LedgerService::validate_can_cancel(ReceivableStatus::Cancelled),
            Err(LedgerError::AlreadyCancelled)
        ));
    }

    #[test]
    fn test_can_pay_open_states() {
        assert!(LedgerService::validate_can_pay(PayableStatus::Pending).is_ok());
        assert!(LedgerService::validate_can_pay(PayableStatus::Partial).is_ok());
        assert!(LedgerService::validate_can_pay(PayableStatus::Paid).is_err());
        assert!(LedgerService::validate_can_pay(PayableStatus::Cancelled).is_err());
    }

    #[test]
    fn test_exact_payment_clears_balance() {
        let outcome = LedgerService::apply_payment(dec!(500.00), dec!(200.00), dec!(300.00))
            .unwrap();
        assert_eq!(outcome.total_paid, dec!(500.00));
        assert_eq!(outcome.status, PayableStatus::Paid);
    }

    #[test]
    fn test_partial_payment_increments_exactly() {
        let outcome = LedgerService::apply_payment(dec!(500.00), Decimal::ZERO, dec!(120.50))
            .unwrap();
        assert_eq!(outcome.total_paid, dec!(120.50));
        assert_eq!(outcome.status, PayableStatus::Partial);
    }

    #[test]
    fn test_overpayment_rejected() {
        let result = LedgerService::apply_payment(dec!(500.00), dec!(400.00), dec!(100.01));
        assert_eq!(
            result,
            Err(LedgerError::Overpayment {
                remaining: dec!(100.00),
                attempted: dec!(100.01),
            })
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-10.00))]
    fn test_non_positive_payment_rejected(#[case] amount_paid: Decimal) {
        assert!(matches!(
            LedgerService::apply_payment(dec!(100.00), Decimal::ZERO, amount_paid),
            Err(LedgerError::NonPositivePayment(_))
        ));
    }

    #[test]
    fn test_auto_settle_requires_immediate_mode() {
        let due = date(2026, 3, 1);
        let today = date(2026, 3, 10);

        assert!(LedgerService::should_auto_settle(
            Some(ReceivableMode::Immediate),
            ReceivableStatus::Pending,
            due,
            today
        ));
        assert!(!LedgerService::should_auto_settle(
            Some(ReceivableMode::Deferred),
            ReceivableStatus::Pending,
            due,
            today
        ));
        // Orphaned receivable (config deleted): never auto-settled.
        assert!(!LedgerService::should_auto_settle(
            None,
            ReceivableStatus::Pending,
            due,
            today
        ));
    }

    #[test]
    fn test_auto_settle_waits_for_due_date() {
        let today = date(2026, 3, 10);

        // Still inside the liquidation window.
        assert!(!LedgerService::should_auto_settle(
            Some(ReceivableMode::Immediate),
            ReceivableStatus::Pending,
            date(2026, 3, 11),
            today
        ));
        // Matures on the due date itself.
        assert!(LedgerService::should_auto_settle(
            Some(ReceivableMode::Immediate),
            ReceivableStatus::Pending,
            today,
            today
        ));
    }

    #[test]
    fn test_auto_settle_is_idempotent_on_status() {
        // Once paid, the rule never fires again.
        assert!(!LedgerService::should_auto_settle(
            Some(ReceivableMode::Immediate),
            ReceivableStatus::Paid,
            date(2026, 3, 1),
            date(2026, 3, 10)
        ));
        assert!(!LedgerService::should_auto_settle(
            Some(ReceivableMode::Immediate),
            ReceivableStatus::Cancelled,
            date(2026, 3, 1),
            date(2026, 3, 10)
        ));
    }

    #[test]
    fn test_derived_receivable_status() {
        let today = date(2026, 3, 10);

        assert_eq!(
            LedgerService::derived_receivable_status(
                ReceivableStatus::Pending,
                date(2026, 3, 11),
                today
            ),
            DerivedReceivableStatus::Pending
        );
        // Due today is not overdue yet.
        assert_eq!(
            LedgerService::derived_receivable_status(ReceivableStatus::Pending, today, today),
            DerivedReceivableStatus::Pending
        );
        assert_eq!(
            LedgerService::derived_receivable_status(
                ReceivableStatus::Pending,
                date(2026, 3, 9),
                today
            ),
            DerivedReceivableStatus::Overdue
        );
        assert_eq!(
            LedgerService::derived_receivable_status(
                ReceivableStatus::Paid,
                date(2026, 3, 1),
                today
            ),
            DerivedReceivableStatus::Paid
        );
        assert_eq!(
            LedgerService::derived_receivable_status(
                ReceivableStatus::Cancelled,
                date(2026, 3, 1),
                today
            ),
            DerivedReceivableStatus::Cancelled
        );
    }

    #[test]
    fn test_derived_payable_status() {
        let today = date(2026, 3, 10);

        assert_eq!(
            LedgerService::derived_payable_status(
                PayableStatus::Partial,
                date(2026, 3, 1),
                today
            ),
            DerivedPayableStatus::Overdue
        );
        assert_eq!(
            LedgerService::derived_payable_status(
                PayableStatus::Partial,
                date(2026, 3, 20),
                today
            ),
            DerivedPayableStatus::Partial
        );
        assert_eq!(
            LedgerService::derived_payable_status(PayableStatus::Paid, date(2026, 3, 1), today),
            DerivedPayableStatus::Paid
        );
    }

    #[test]
    fn test_payment_sequence_reaches_paid() {
        // Pay 500 in three goes: 200, 200, 100.
        let amount = dec!(500.00);
        let first = LedgerService::apply_payment(amount, Decimal::ZERO, dec!(200.00)).unwrap();
        assert_eq!(first.status, PayableStatus::Partial);
        let second = LedgerService::apply_payment(amount, first.total_paid, dec!(200.00)).unwrap();
        assert_eq!(second.status, PayableStatus::Partial);
        let third = LedgerService::apply_payment(amount, second.total_paid, dec!(100.00)).unwrap();
        assert_eq!(third.status, PayableStatus::Paid);
        assert_eq!(third.total_paid, amount);
    }
}
