//! Payment method configuration repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    payment_method_configs, receivables,
    sea_orm_active_enums::{PaymentMethod, ReceivableMode},
};
use fluxo_core::settlement::PaymentMethodConfig as CoreConfig;
use fluxo_shared::types::{BankAccountId, PaymentConfigId};

/// Error types for payment config operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentConfigError {
    /// Config not found.
    #[error("Payment config not found: {0}")]
    NotFound(Uuid),

    /// Explicitly requested config is inactive.
    #[error("Payment config {0} is inactive")]
    Inactive(Uuid),

    /// Installment bracket is inverted or out of range.
    #[error("Invalid installment bracket {min}-{max}")]
    InvalidBracket {
        /// Bracket lower bound.
        min: u32,
        /// Bracket upper bound.
        max: u32,
    },

    /// Fee percentage must be non-negative.
    #[error("Fee percent cannot be negative, got {0}")]
    NegativeFee(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a payment method config.
#[derive(Debug, Clone)]
pub struct CreatePaymentConfigInput {
    /// Payment method covered.
    pub method: PaymentMethod,
    /// Optional provider/acquirer label.
    pub provider: Option<String>,
    /// Bracket lower bound (inclusive).
    pub min_installments: u32,
    /// Bracket upper bound (inclusive).
    pub max_installments: u32,
    /// Fee percentage per installment share.
    pub fee_percent: Decimal,
    /// Days until funds liquidate.
    pub days_to_liquidate: u32,
    /// Immediate or deferred realization.
    pub receivable_mode: ReceivableMode,
    /// Bank account credited automatically on settlement.
    pub bank_account_id: Option<Uuid>,
}

/// Repository for payment method configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfigRepository {
    db: DatabaseConnection,
}

impl PaymentConfigRepository {
    /// Creates a new payment config repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new config.
    ///
    /// # Errors
    ///
    /// Rejects inverted brackets and negative fees before touching the
    /// database.
    pub async fn create(
        &self,
        input: CreatePaymentConfigInput,
    ) -> Result<payment_method_configs::Model, PaymentConfigError> {
        if input.min_installments == 0 || input.max_installments < input.min_installments {
            return Err(PaymentConfigError::InvalidBracket {
                min: input.min_installments,
                max: input.max_installments,
            });
        }
        if input.fee_percent < Decimal::ZERO {
            return Err(PaymentConfigError::NegativeFee(input.fee_percent));
        }

        let now = Utc::now().into();
        let config = payment_method_configs::ActiveModel {
            id: Set(PaymentConfigId::new().into_inner()),
            method: Set(input.method),
            provider: Set(input.provider),
            min_installments: Set(i32::try_from(input.min_installments).unwrap_or(i32::MAX)),
            max_installments: Set(i32::try_from(input.max_installments).unwrap_or(i32::MAX)),
            fee_percent: Set(input.fee_percent),
            days_to_liquidate: Set(i32::try_from(input.days_to_liquidate).unwrap_or(i32::MAX)),
            receivable_mode: Set(input.receivable_mode),
            bank_account_id: Set(input.bank_account_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = config.insert(&self.db).await?;
        info!(config_id = %model.id, method = ?model.method, "Created payment config");
        Ok(model)
    }

    /// Lists all configs.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<payment_method_configs::Model>, PaymentConfigError> {
        let configs = payment_method_configs::Entity::find().all(&self.db).await?;
        Ok(configs)
    }

    /// Gets a config by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs.
    pub async fn get(&self, id: Uuid) -> Result<payment_method_configs::Model, PaymentConfigError> {
        payment_method_configs::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PaymentConfigError::NotFound(id))
    }

    /// Resolves the config applicable to a settlement.
    ///
    /// An explicit ID must exist and be active. Without one, the best
    /// match among active configs for the method and installment count is
    /// returned; `None` means the caller falls back to the zero-fee,
    /// same-day default.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`/`Inactive` only for explicit IDs; a missing best
    /// match is not an error.
    pub async fn resolve(
        &self,
        method: PaymentMethod,
        installments: u32,
        explicit: Option<Uuid>,
    ) -> Result<Option<payment_method_configs::Model>, PaymentConfigError> {
        if let Some(id) = explicit {
            let config = payment_method_configs::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(PaymentConfigError::NotFound(id))?;
            if !config.is_active {
                return Err(PaymentConfigError::Inactive(id));
            }
            return Ok(Some(config));
        }

        let installments_i32 = i32::try_from(installments).unwrap_or(i32::MAX);
        let candidates = payment_method_configs::Entity::find()
            .filter(payment_method_configs::Column::Method.eq(method))
            .filter(payment_method_configs::Column::IsActive.eq(true))
            .filter(payment_method_configs::Column::MinInstallments.lte(installments_i32))
            .filter(payment_method_configs::Column::MaxInstallments.gte(installments_i32))
            .all(&self.db)
            .await?;

        Ok(best_match(candidates))
    }

    /// Deletes a config, nulling dependent receivable references first.
    ///
    /// Soft decoupling: receivables survive their config. Both steps run
    /// in one transaction so a failure leaves the reference intact.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs.
    pub async fn delete(&self, id: Uuid) -> Result<(), PaymentConfigError> {
        let txn = self.db.begin().await?;

        let config = payment_method_configs::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PaymentConfigError::NotFound(id))?;

        let detached = receivables::Entity::update_many()
            .set(receivables::ActiveModel {
                payment_config_id: Set(None),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(receivables::Column::PaymentConfigId.eq(id))
            .exec(&txn)
            .await?;

        payment_method_configs::Entity::delete_by_id(config.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!(
            config_id = %id,
            detached_receivables = detached.rows_affected,
            "Deleted payment config"
        );
        Ok(())
    }
}

/// Picks the best config among bracket matches: the narrowest bracket
/// wins, ties broken by creation order.
#[must_use]
pub fn best_match(
    mut candidates: Vec<payment_method_configs::Model>,
) -> Option<payment_method_configs::Model> {
    candidates.sort_by_key(|c| (c.max_installments - c.min_installments, c.created_at));
    candidates.into_iter().next()
}

/// Converts a stored config into the core calculator's representation.
#[must_use]
pub fn to_core_config(model: &payment_method_configs::Model) -> CoreConfig {
    CoreConfig {
        id: PaymentConfigId::from_uuid(model.id),
        method: model.method.clone().into(),
        provider: model.provider.clone(),
        min_installments: u32::try_from(model.min_installments).unwrap_or(1),
        max_installments: u32::try_from(model.max_installments).unwrap_or(1),
        fee_percent: model.fee_percent,
        days_to_liquidate: u32::try_from(model.days_to_liquidate).unwrap_or(0),
        receivable_mode: model.receivable_mode.clone().into(),
        bank_account_id: model.bank_account_id.map(BankAccountId::from_uuid),
        is_active: model.is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn config(min: i32, max: i32, minutes: i64) -> payment_method_configs::Model {
        let created = chrono::FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .unwrap()
            + chrono::Duration::minutes(minutes);
        payment_method_configs::Model {
            id: Uuid::new_v4(),
            method: PaymentMethod::CreditCard,
            provider: None,
            min_installments: min,
            max_installments: max,
            fee_percent: dec!(4.50),
            days_to_liquidate: 30,
            receivable_mode: ReceivableMode::Immediate,
            bank_account_id: None,
            is_active: true,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_best_match_prefers_narrowest_bracket() {
        let wide = config(1, 12, 0);
        let narrow = config(2, 6, 5);
        let winner = best_match(vec![wide, narrow.clone()]).unwrap();
        assert_eq!(winner.id, narrow.id);
    }

    #[test]
    fn test_best_match_tie_breaks_by_creation() {
        let older = config(1, 6, 0);
        let newer = config(1, 6, 5);
        let winner = best_match(vec![newer, older.clone()]).unwrap();
        assert_eq!(winner.id, older.id);
    }

    #[test]
    fn test_best_match_empty() {
        assert!(best_match(vec![]).is_none());
    }

    #[test]
    fn test_to_core_config_bridges_fields() {
        let model = config(2, 6, 0);
        let core = to_core_config(&model);
        assert_eq!(core.min_installments, 2);
        assert_eq!(core.max_installments, 6);
        assert_eq!(core.fee_percent, dec!(4.50));
        assert_eq!(core.days_to_liquidate, 30);
        assert!(core.is_active);
        assert!(!core.is_instant());
    }
}
