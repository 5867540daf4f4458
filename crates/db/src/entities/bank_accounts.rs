//! `SeaORM` Entity for the bank_accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A bank account whose balance is mutated only through settlement and
/// payment side effects, never directly.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name (e.g. "Banco Itau - Conta PJ").
    pub name: String,
    /// Current balance.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub current_balance: Decimal,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Imported statement lines for this account.
    #[sea_orm(has_many = "super::bank_transactions::Entity")]
    BankTransactions,
}

impl Related<super::bank_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
