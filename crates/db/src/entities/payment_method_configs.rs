//! `SeaORM` Entity for the payment_method_configs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, ReceivableMode};

/// Configuration for one payment method / provider / installment bracket.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_method_configs")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Payment method this config applies to.
    pub method: PaymentMethod,
    /// Optional provider/acquirer label.
    pub provider: Option<String>,
    /// Lowest installment count covered (inclusive).
    pub min_installments: i32,
    /// Highest installment count covered (inclusive).
    pub max_installments: i32,
    /// Fee percentage per installment share.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub fee_percent: Decimal,
    /// Days until funds liquidate (0 = same-day).
    pub days_to_liquidate: i32,
    /// Immediate or deferred realization.
    pub receivable_mode: ReceivableMode,
    /// Bank account credited automatically on settlement.
    pub bank_account_id: Option<Uuid>,
    /// Inactive configs are never resolved for new settlements.
    pub is_active: bool,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Linked bank account for automatic crediting.
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
    /// Receivables created under this config.
    #[sea_orm(has_many = "super::receivables::Entity")]
    Receivables,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::receivables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receivables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
