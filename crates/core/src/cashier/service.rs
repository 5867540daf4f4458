//! Cash-register session rules.

use rust_decimal::Decimal;

use super::error::CashierError;
use super::types::{BalanceBreakdown, CashSessionStatus, MovementDirection};

/// Cashier service for session validation and balance arithmetic.
///
/// This service contains pure business logic with no database dependencies.
pub struct CashierService;

impl CashierService {
    /// Validates the opening balance of a new session.
    ///
    /// # Errors
    ///
    /// Returns `NegativeOpeningBalance` for negative amounts. Zero is
    /// valid; a drawer can open empty.
    pub fn validate_opening_balance(opening_balance: Decimal) -> Result<(), CashierError> {
        if opening_balance < Decimal::ZERO {
            return Err(CashierError::NegativeOpeningBalance(opening_balance));
        }
        Ok(())
    }

    /// Validates a sangria/suprimento against the session state.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` for sealed sessions and
    /// `NonPositiveAmount` for zero or negative amounts.
    pub fn validate_movement(
        status: CashSessionStatus,
        amount: Decimal,
    ) -> Result<(), CashierError> {
        if !status.is_open() {
            return Err(CashierError::SessionClosed);
        }
        if amount <= Decimal::ZERO {
            return Err(CashierError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    /// Validates that a session can be closed.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if it was already sealed.
    pub fn validate_can_close(status: CashSessionStatus) -> Result<(), CashierError> {
        if !status.is_open() {
            return Err(CashierError::SessionClosed);
        }
        Ok(())
    }

    /// Builds the balance breakdown from the opening figure, the
    /// cash-settled sale revenue, and the recorded movements.
    ///
    /// Movements do not carry running balances; the breakdown is computed
    /// on demand from the append-only list.
    #[must_use]
    pub fn breakdown(
        opening_balance: Decimal,
        cash_sales: Decimal,
        movements: &[(MovementDirection, Decimal)],
    ) -> BalanceBreakdown {
        let mut supplies = Decimal::ZERO;
        let mut withdrawals = Decimal::ZERO;
        for (direction, amount) in movements {
            match direction {
                MovementDirection::In => supplies += *amount,
                MovementDirection::Out => withdrawals += *amount,
            }
        }

        BalanceBreakdown {
            opening_balance,
            cash_sales,
            supplies,
            withdrawals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_opening_balance_validation() {
        assert!(CashierService::validate_opening_balance(dec!(1000.00)).is_ok());
        assert!(CashierService::validate_opening_balance(Decimal::ZERO).is_ok());
        assert!(matches!(
            CashierService::validate_opening_balance(dec!(-0.01)),
            Err(CashierError::NegativeOpeningBalance(_))
        ));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-50.00))]
    fn test_movement_rejects_non_positive(#[case] amount: Decimal) {
        assert!(matches!(
            CashierService::validate_movement(CashSessionStatus::Open, amount),
            Err(CashierError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_movement_rejects_closed_session() {
        assert!(matches!(
            CashierService::validate_movement(CashSessionStatus::Closed, dec!(10.00)),
            Err(CashierError::SessionClosed)
        ));
        assert!(CashierService::validate_movement(CashSessionStatus::Open, dec!(10.00)).is_ok());
    }

    #[test]
    fn test_close_only_open_sessions() {
        assert!(CashierService::validate_can_close(CashSessionStatus::Open).is_ok());
        assert!(matches!(
            CashierService::validate_can_close(CashSessionStatus::Closed),
            Err(CashierError::SessionClosed)
        ));
    }

    #[test]
    fn test_breakdown_sums_by_direction() {
        let movements = vec![
            (MovementDirection::In, dec!(50.00)),
            (MovementDirection::Out, dec!(20.00)),
            (MovementDirection::In, dec!(30.00)),
            (MovementDirection::Out, dec!(5.00)),
        ];
        let breakdown = CashierService::breakdown(dec!(1000.00), dec!(100.00), &movements);

        assert_eq!(breakdown.supplies, dec!(80.00));
        assert_eq!(breakdown.withdrawals, dec!(25.00));
        assert_eq!(breakdown.expected_balance(), dec!(1155.00));
    }

    #[test]
    fn test_breakdown_without_movements() {
        let breakdown = CashierService::breakdown(dec!(200.00), Decimal::ZERO, &[]);
        assert_eq!(breakdown.expected_balance(), dec!(200.00));
        assert_eq!(breakdown.difference(dec!(200.00)), Decimal::ZERO);
    }
}
