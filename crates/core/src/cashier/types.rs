//! Cash-register session types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status of a cash-register session.
///
/// Exactly one open session may exist per terminal; once closed, the
/// session and its figures are immutable history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashSessionStatus {
    /// Session is open and accepting movements.
    Open,
    /// Session was sealed by the close operation.
    Closed,
}

impl CashSessionStatus {
    /// Returns true if the session still accepts movements.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Direction of a manual cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Suprimento: cash supplied into the drawer.
    In,
    /// Sangria: cash withdrawn from the drawer.
    Out,
}

/// The components of a session's expected balance.
///
/// `expected = opening + cash_sales + supplies - withdrawals`. The
/// difference against the counted closing figure is surfaced as data,
/// never silently corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceBreakdown {
    /// Balance the session opened with.
    pub opening_balance: Decimal,
    /// Cash-settled sale revenue recorded during the session.
    pub cash_sales: Decimal,
    /// Total suprimentos (cash in).
    pub supplies: Decimal,
    /// Total sangrias (cash out).
    pub withdrawals: Decimal,
}

impl BalanceBreakdown {
    /// The balance the drawer should hold.
    #[must_use]
    pub fn expected_balance(&self) -> Decimal {
        self.opening_balance + self.cash_sales + self.supplies - self.withdrawals
    }

    /// Difference between the counted closing balance and the expectation.
    ///
    /// Positive = drawer over, negative = drawer short.
    #[must_use]
    pub fn difference(&self, closing_balance: Decimal) -> Decimal {
        closing_balance - self.expected_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expected_balance_arithmetic() {
        // Opening 1000, one cash sale of 100, one suprimento of 50,
        // one sangria of 20 => expected 1130.
        let breakdown = BalanceBreakdown {
            opening_balance: dec!(1000.00),
            cash_sales: dec!(100.00),
            supplies: dec!(50.00),
            withdrawals: dec!(20.00),
        };
        assert_eq!(breakdown.expected_balance(), dec!(1130.00));
    }

    #[test]
    fn test_difference_sign() {
        let breakdown = BalanceBreakdown {
            opening_balance: dec!(100.00),
            cash_sales: Decimal::ZERO,
            supplies: Decimal::ZERO,
            withdrawals: Decimal::ZERO,
        };
        assert_eq!(breakdown.difference(dec!(90.00)), dec!(-10.00));
        assert_eq!(breakdown.difference(dec!(105.00)), dec!(5.00));
        assert_eq!(breakdown.difference(dec!(100.00)), Decimal::ZERO);
    }

    #[test]
    fn test_session_status() {
        assert!(CashSessionStatus::Open.is_open());
        assert!(!CashSessionStatus::Closed.is_open());
    }
}
