//! Settlement domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::ReceivableStatus;
use fluxo_shared::types::{BankAccountId, CustomerId, PaymentConfigId, SaleId};

/// Payment methods accepted at the point of sale.
///
/// A closed enumeration: an unhandled method is a compile-time gap, not a
/// silent runtime default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash handed to the register.
    Cash,
    /// Credit card, usually in installments.
    CreditCard,
    /// Debit card, liquidated same-day.
    DebitCard,
    /// Pix instant transfer.
    Pix,
    /// Direct bank transfer.
    BankTransfer,
    /// Bank slip (boleto), collected on presentation.
    BankSlip,
}

impl PaymentMethod {
    /// Returns true if proceeds arrive as physical cash in the register.
    ///
    /// Only cash-settled sales enter the cash-register balance arithmetic;
    /// every other method settles through a bank track.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Cash => "cash",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Pix => "pix",
            Self::BankTransfer => "bank_transfer",
            Self::BankSlip => "bank_slip",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "pix" => Ok(Self::Pix),
            "bank_transfer" => Ok(Self::BankTransfer),
            "bank_slip" => Ok(Self::BankSlip),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

/// Whether a method's proceeds are considered realized same-day or only
/// after the liquidation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivableMode {
    /// Funds are realized as soon as the liquidation window elapses,
    /// without an explicit collection step.
    Immediate,
    /// Funds require an explicit receive operation (e.g. boleto).
    Deferred,
}

/// Configuration for one payment method / provider / installment bracket.
///
/// Carries the fee percentage, the number of days until funds liquidate,
/// and the receivable mode. Referenced by receivables at settlement time;
/// deleting a config nulls those references, never the rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodConfig {
    /// Unique identifier.
    pub id: PaymentConfigId,
    /// The payment method this config applies to.
    pub method: PaymentMethod,
    /// Optional provider/acquirer label (e.g. "Stone", "Cielo").
    pub provider: Option<String>,
    /// Lowest installment count this bracket covers (inclusive).
    pub min_installments: u32,
    /// Highest installment count this bracket covers (inclusive).
    pub max_installments: u32,
    /// Fee percentage charged per installment share (e.g. 4.5 = 4.5%).
    pub fee_percent: Decimal,
    /// Days until funds are liquidated. 0 = same-day.
    pub days_to_liquidate: u32,
    /// Immediate or deferred realization.
    pub receivable_mode: ReceivableMode,
    /// Bank account credited automatically when receivables settle.
    pub bank_account_id: Option<BankAccountId>,
    /// Inactive configs are never resolved for new settlements.
    pub is_active: bool,
}

impl PaymentMethodConfig {
    /// The zero-fee, same-day fallback used when no config matches a sale.
    #[must_use]
    pub fn same_day_default(method: PaymentMethod) -> Self {
        Self {
            id: PaymentConfigId::new(),
            method,
            provider: None,
            min_installments: 1,
            max_installments: u32::MAX,
            fee_percent: Decimal::ZERO,
            days_to_liquidate: 0,
            receivable_mode: ReceivableMode::Immediate,
            bank_account_id: None,
            is_active: true,
        }
    }

    /// Returns true if this bracket covers the given installment count.
    #[must_use]
    pub fn covers_installments(&self, count: u32) -> bool {
        count >= self.min_installments && count <= self.max_installments
    }

    /// Returns true if receivables under this config are realized at
    /// creation (same-day liquidation, immediate mode).
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.days_to_liquidate == 0 && self.receivable_mode == ReceivableMode::Immediate
    }
}

/// Input for calculating the settlement of one sale.
#[derive(Debug, Clone)]
pub struct SettlementInput {
    /// The sale being settled.
    pub sale_id: SaleId,
    /// Optional customer the receivables belong to.
    pub customer_id: Option<CustomerId>,
    /// Total amount of the sale.
    pub sale_total: Decimal,
    /// Calendar date of the sale (anchors the due-date schedule).
    pub sale_date: NaiveDate,
    /// How the sale was paid.
    pub method: PaymentMethod,
    /// Number of installments (1 = single payment).
    pub installments: u32,
}

/// One scheduled receivable produced by the settlement calculator.
///
/// Invariant: `net_amount = gross_amount - fee_amount`, and across a
/// settlement the gross amounts sum to the sale total exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReceivable {
    /// 1-based installment position.
    pub installment_number: u32,
    /// Total number of installments in the settlement.
    pub total_installments: u32,
    /// This installment's share of the sale total.
    pub gross_amount: Decimal,
    /// Fee retained by the payment provider.
    pub fee_amount: Decimal,
    /// Amount the business actually collects.
    pub net_amount: Decimal,
    /// Date the funds liquidate.
    pub due_date: NaiveDate,
    /// Initial lifecycle status (paid for instant configs, else pending).
    pub status: ReceivableStatus,
    /// Set at creation only for instant configs.
    pub paid_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Pix,
            PaymentMethod::BankTransfer,
            PaymentMethod::BankSlip,
        ] {
            assert_eq!(
                PaymentMethod::from_str(&method.to_string()).unwrap(),
                method
            );
        }
        assert!(PaymentMethod::from_str("barter").is_err());
    }

    #[test]
    fn test_only_cash_is_cash() {
        assert!(PaymentMethod::Cash.is_cash());
        assert!(!PaymentMethod::DebitCard.is_cash());
        assert!(!PaymentMethod::Pix.is_cash());
    }

    #[test]
    fn test_same_day_default_is_instant_and_free() {
        let config = PaymentMethodConfig::same_day_default(PaymentMethod::Pix);
        assert!(config.is_instant());
        assert_eq!(config.fee_percent, Decimal::ZERO);
        assert!(config.covers_installments(1));
        assert!(config.covers_installments(48));
    }

    #[test]
    fn test_covers_installments_bracket() {
        let config = PaymentMethodConfig {
            min_installments: 2,
            max_installments: 6,
            ..PaymentMethodConfig::same_day_default(PaymentMethod::CreditCard)
        };
        assert!(!config.covers_installments(1));
        assert!(config.covers_installments(2));
        assert!(config.covers_installments(6));
        assert!(!config.covers_installments(7));
    }

    #[test]
    fn test_deferred_zero_day_is_not_instant() {
        let config = PaymentMethodConfig {
            receivable_mode: ReceivableMode::Deferred,
            ..PaymentMethodConfig::same_day_default(PaymentMethod::BankSlip)
        };
        assert!(!config.is_instant());
    }
}
