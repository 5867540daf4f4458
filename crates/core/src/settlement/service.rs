//! Settlement calculator.
//!
//! Pure calculation: consumes a sale and a resolved payment method config,
//! produces the scheduled receivables. Resolution of the config itself and
//! persistence are the caller's concern.

use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::SettlementError;
use super::types::{PaymentMethodConfig, ScheduledReceivable, SettlementInput};
use crate::ledger::ReceivableStatus;

/// Days between consecutive installment due dates.
///
/// Literal 30-day spacing, not calendar-month spacing: installment N is due
/// 30·(N−1) days after the first installment's due date.
pub const INSTALLMENT_SPACING_DAYS: i64 = 30;

/// Settlement calculator for sale payments.
///
/// This service contains pure business logic with no database dependencies.
pub struct SettlementCalculator;

impl SettlementCalculator {
    /// Calculates the scheduled receivables for a sale.
    ///
    /// 1. Validates the sale amounts and the config applicability.
    /// 2. Splits the total into equal shares, the final installment
    ///    absorbing the rounding remainder so the shares sum exactly.
    /// 3. Computes the provider fee per share (banker's rounding, 2 dp).
    /// 4. Schedules due dates from `sale_date + days_to_liquidate`, spaced
    ///    [`INSTALLMENT_SPACING_DAYS`] apart.
    /// 5. Instant configs (same-day, immediate mode) produce receivables
    ///    born `paid` with `paid_date = sale_date`; everything else is
    ///    born `pending`.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError` if validation fails. Nothing is mutated on
    /// error; the caller aborts the sale settlement.
    pub fn calculate(
        input: &SettlementInput,
        config: &PaymentMethodConfig,
    ) -> Result<Vec<ScheduledReceivable>, SettlementError> {
        if input.sale_total <= Decimal::ZERO {
            return Err(SettlementError::NonPositiveTotal(input.sale_total));
        }
        if input.sale_total.round_dp(2) != input.sale_total {
            return Err(SettlementError::PrecisionTooFine(input.sale_total));
        }
        if input.installments == 0 {
            return Err(SettlementError::NoInstallments);
        }
        if !config.is_active {
            return Err(SettlementError::InactiveConfig(config.id));
        }
        if config.method != input.method {
            return Err(SettlementError::MethodMismatch {
                config: config.method,
                sale: input.method,
            });
        }
        if !config.covers_installments(input.installments) {
            return Err(SettlementError::InstallmentsOutOfRange {
                requested: input.installments,
                min: config.min_installments,
                max: config.max_installments,
            });
        }

        let shares = Self::split_total(input.sale_total, input.installments);
        let first_due = input.sale_date + Duration::days(i64::from(config.days_to_liquidate));
        let instant = config.is_instant();

        let mut scheduled = Vec::with_capacity(shares.len());
        for (offset, gross_amount) in (0u32..).zip(shares) {
            let fee_amount = Self::fee_for(gross_amount, config.fee_percent);
            let due_date = first_due + Duration::days(i64::from(offset) * INSTALLMENT_SPACING_DAYS);
            let (status, paid_date) = if instant {
                (ReceivableStatus::Paid, Some(input.sale_date))
            } else {
                (ReceivableStatus::Pending, None)
            };

            scheduled.push(ScheduledReceivable {
                installment_number: offset + 1,
                total_installments: input.installments,
                gross_amount,
                fee_amount,
                net_amount: gross_amount - fee_amount,
                due_date,
                status,
                paid_date,
            });
        }

        Ok(scheduled)
    }

    /// Splits a total into `count` equal shares that sum exactly.
    ///
    /// Each share is the total divided by the count truncated to cents;
    /// the final share absorbs the remainder.
    #[must_use]
    pub fn split_total(total: Decimal, count: u32) -> Vec<Decimal> {
        if count == 0 {
            return Vec::new();
        }

        let base =
            (total / Decimal::from(count)).round_dp_with_strategy(2, RoundingStrategy::ToZero);

        let mut shares = vec![base; count as usize];
        if let Some(last) = shares.last_mut() {
            *last = total - base * Decimal::from(count - 1);
        }
        shares
    }

    /// Computes the provider fee for one share.
    ///
    /// Banker's rounding (midpoint-nearest-even) at 2 decimal places.
    #[must_use]
    pub fn fee_for(share: Decimal, fee_percent: Decimal) -> Decimal {
        (share * fee_percent / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::types::{PaymentMethod, ReceivableMode};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn credit_config(fee_percent: Decimal, days: u32) -> PaymentMethodConfig {
        PaymentMethodConfig {
            method: PaymentMethod::CreditCard,
            fee_percent,
            days_to_liquidate: days,
            receivable_mode: ReceivableMode::Immediate,
            ..PaymentMethodConfig::same_day_default(PaymentMethod::CreditCard)
        }
    }

    fn make_input(total: Decimal, method: PaymentMethod, installments: u32) -> SettlementInput {
        SettlementInput {
            sale_id: fluxo_shared::types::SaleId::new(),
            customer_id: None,
            sale_total: total,
            sale_date: date(2026, 3, 10),
            method,
            installments,
        }
    }

    #[test]
    fn test_three_installments_at_five_percent() {
        let input = make_input(dec!(300.00), PaymentMethod::CreditCard, 3);
        let config = credit_config(dec!(5), 30);

        let scheduled = SettlementCalculator::calculate(&input, &config).unwrap();

        assert_eq!(scheduled.len(), 3);
        for (i, r) in scheduled.iter().enumerate() {
            assert_eq!(r.gross_amount, dec!(100.00));
            assert_eq!(r.fee_amount, dec!(5.00));
            assert_eq!(r.net_amount, dec!(95.00));
            assert_eq!(r.installment_number, u32::try_from(i).unwrap() + 1);
            assert_eq!(r.total_installments, 3);
            assert_eq!(r.status, ReceivableStatus::Pending);
            assert!(r.paid_date.is_none());
        }
        // Due dates start at sale_date + days_to_liquidate, spaced 30 days.
        assert_eq!(scheduled[0].due_date, date(2026, 4, 9));
        assert_eq!(scheduled[1].due_date, date(2026, 5, 9));
        assert_eq!(scheduled[2].due_date, date(2026, 6, 8));
    }

    #[test]
    fn test_instant_config_settles_at_creation() {
        let input = make_input(dec!(80.00), PaymentMethod::Cash, 1);
        let config = PaymentMethodConfig::same_day_default(PaymentMethod::Cash);

        let scheduled = SettlementCalculator::calculate(&input, &config).unwrap();

        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].status, ReceivableStatus::Paid);
        assert_eq!(scheduled[0].paid_date, Some(date(2026, 3, 10)));
        assert_eq!(scheduled[0].due_date, date(2026, 3, 10));
        assert_eq!(scheduled[0].net_amount, dec!(80.00));
    }

    #[test]
    fn test_one_day_liquidation_is_pending() {
        // Pix configured for 1-day liquidation must be pending, not paid,
        // even though the method family is instant by reputation.
        let input = make_input(dec!(50.00), PaymentMethod::Pix, 1);
        let config = PaymentMethodConfig {
            method: PaymentMethod::Pix,
            days_to_liquidate: 1,
            fee_percent: dec!(0.99),
            ..PaymentMethodConfig::same_day_default(PaymentMethod::Pix)
        };

        let scheduled = SettlementCalculator::calculate(&input, &config).unwrap();

        assert_eq!(scheduled[0].status, ReceivableStatus::Pending);
        assert!(scheduled[0].paid_date.is_none());
        assert_eq!(scheduled[0].due_date, date(2026, 3, 11));
    }

    #[test]
    fn test_deferred_zero_day_is_pending() {
        let input = make_input(dec!(120.00), PaymentMethod::BankSlip, 1);
        let config = PaymentMethodConfig {
            method: PaymentMethod::BankSlip,
            receivable_mode: ReceivableMode::Deferred,
            ..PaymentMethodConfig::same_day_default(PaymentMethod::BankSlip)
        };

        let scheduled = SettlementCalculator::calculate(&input, &config).unwrap();
        assert_eq!(scheduled[0].status, ReceivableStatus::Pending);
    }

    #[rstest]
    #[case(dec!(100.00), 3, dec!(33.33), dec!(33.34))]
    #[case(dec!(100.00), 4, dec!(25.00), dec!(25.00))]
    #[case(dec!(0.10), 3, dec!(0.03), dec!(0.04))]
    #[case(dec!(99.99), 2, dec!(49.99), dec!(50.00))]
    fn test_split_remainder_goes_to_last(
        #[case] total: Decimal,
        #[case] count: u32,
        #[case] expected_base: Decimal,
        #[case] expected_last: Decimal,
    ) {
        let shares = SettlementCalculator::split_total(total, count);
        assert_eq!(shares.len(), count as usize);
        for share in &shares[..shares.len() - 1] {
            assert_eq!(*share, expected_base);
        }
        assert_eq!(*shares.last().unwrap(), expected_last);
        assert_eq!(shares.iter().sum::<Decimal>(), total);
    }

    #[test]
    fn test_fee_uses_bankers_rounding() {
        // 33.33 * 2.25% = 0.749925 -> 0.75
        assert_eq!(SettlementCalculator::fee_for(dec!(33.33), dec!(2.25)), dec!(0.75));
        // 10.00 * 0.25% = 0.025 -> midpoint rounds to even: 0.02
        assert_eq!(SettlementCalculator::fee_for(dec!(10.00), dec!(0.25)), dec!(0.02));
        // 30.00 * 0.25% = 0.075 -> midpoint rounds to even: 0.08
        assert_eq!(SettlementCalculator::fee_for(dec!(30.00), dec!(0.25)), dec!(0.08));
        assert_eq!(SettlementCalculator::fee_for(dec!(100.00), Decimal::ZERO), dec!(0.00));
    }

    #[test]
    fn test_rejects_non_positive_total() {
        let input = make_input(dec!(0), PaymentMethod::Cash, 1);
        let config = PaymentMethodConfig::same_day_default(PaymentMethod::Cash);
        assert!(matches!(
            SettlementCalculator::calculate(&input, &config),
            Err(SettlementError::NonPositiveTotal(_))
        ));
    }

    #[test]
    fn test_rejects_sub_cent_total() {
        let input = make_input(dec!(10.001), PaymentMethod::Cash, 1);
        let config = PaymentMethodConfig::same_day_default(PaymentMethod::Cash);
        assert!(matches!(
            SettlementCalculator::calculate(&input, &config),
            Err(SettlementError::PrecisionTooFine(_))
        ));
    }

    #[test]
    fn test_rejects_zero_installments() {
        let input = make_input(dec!(10.00), PaymentMethod::CreditCard, 0);
        let config = credit_config(dec!(5), 30);
        assert!(matches!(
            SettlementCalculator::calculate(&input, &config),
            Err(SettlementError::NoInstallments)
        ));
    }

    #[test]
    fn test_rejects_installments_outside_bracket() {
        let input = make_input(dec!(10.00), PaymentMethod::CreditCard, 8);
        let config = PaymentMethodConfig {
            min_installments: 2,
            max_installments: 6,
            ..credit_config(dec!(5), 30)
        };
        assert!(matches!(
            SettlementCalculator::calculate(&input, &config),
            Err(SettlementError::InstallmentsOutOfRange {
                requested: 8,
                min: 2,
                max: 6
            })
        ));
    }

    #[test]
    fn test_rejects_method_mismatch() {
        let input = make_input(dec!(10.00), PaymentMethod::Pix, 1);
        let config = credit_config(dec!(5), 30);
        assert!(matches!(
            SettlementCalculator::calculate(&input, &config),
            Err(SettlementError::MethodMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_inactive_config() {
        let input = make_input(dec!(10.00), PaymentMethod::CreditCard, 1);
        let config = PaymentMethodConfig {
            is_active: false,
            ..credit_config(dec!(5), 30)
        };
        assert!(matches!(
            SettlementCalculator::calculate(&input, &config),
            Err(SettlementError::InactiveConfig(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// For any sale total and installment count, the shares sum to the
        /// total exactly - no rounding drift.
        #[test]
        fn prop_installment_sum_is_exact(
            cents in 1i64..100_000_000i64,
            count in 1u32..=24u32,
        ) {
            let total = Decimal::new(cents, 2);
            let shares = SettlementCalculator::split_total(total, count);

            prop_assert_eq!(shares.len(), count as usize);
            prop_assert_eq!(shares.iter().sum::<Decimal>(), total);
            // Shares never go negative, and only the last can differ.
            for share in &shares {
                prop_assert!(*share >= Decimal::ZERO);
            }
            let base = shares[0];
            for share in &shares[..shares.len() - 1] {
                prop_assert_eq!(*share, base);
            }
        }

        /// For any settlement, gross sums to the total and net + fee sums
        /// to the total, so no cent is ever silently lost to fees.
        #[test]
        fn prop_net_plus_fee_equals_total(
            cents in 1i64..10_000_000i64,
            count in 1u32..=12u32,
            fee_bps in 0u32..2000u32,
        ) {
            let input = make_input(Decimal::new(cents, 2), PaymentMethod::CreditCard, count);
            let config = credit_config(Decimal::new(i64::from(fee_bps), 2), 30);

            let scheduled = SettlementCalculator::calculate(&input, &config).unwrap();

            let gross: Decimal = scheduled.iter().map(|r| r.gross_amount).sum();
            let net: Decimal = scheduled.iter().map(|r| r.net_amount).sum();
            let fee: Decimal = scheduled.iter().map(|r| r.fee_amount).sum();

            prop_assert_eq!(gross, input.sale_total);
            prop_assert_eq!(net + fee, input.sale_total);
            for r in &scheduled {
                prop_assert_eq!(r.net_amount + r.fee_amount, r.gross_amount);
            }
        }

        /// Consecutive due dates are always exactly 30 days apart.
        #[test]
        fn prop_due_dates_spaced_thirty_days(
            count in 2u32..=12u32,
            days in 0u32..=45u32,
        ) {
            let input = make_input(dec!(600.00), PaymentMethod::CreditCard, count);
            let config = credit_config(dec!(4.5), days);

            let scheduled = SettlementCalculator::calculate(&input, &config).unwrap();

            prop_assert_eq!(
                scheduled[0].due_date,
                input.sale_date + Duration::days(i64::from(days))
            );
            for pair in scheduled.windows(2) {
                prop_assert_eq!(pair[1].due_date - pair[0].due_date, Duration::days(30));
            }
        }
    }
}
