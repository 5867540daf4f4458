//! `SeaORM` Entity for the financial_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{TransactionCategory, TransactionKind};

/// A realized ledger entry: the system-of-record row posted whenever a
/// receivable or payable settles or a bank line is matched/created.
///
/// Cash-flow reporting reads these rows; nothing else writes them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_transactions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Revenue or expense.
    pub kind: TransactionKind,
    /// Realized amount (always positive; kind carries the direction).
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    /// Calendar date the movement was realized.
    pub transaction_date: Date,
    /// Reporting category.
    pub category: TransactionCategory,
    /// Human-readable description.
    pub description: String,
    /// Receivable that settled into this row, if any.
    pub receivable_id: Option<Uuid>,
    /// Payable this payment row belongs to, if any.
    pub payable_id: Option<Uuid>,
    /// Cash session this revenue was drawered under, if cash-settled.
    pub cash_session_id: Option<Uuid>,
    /// Bank account credited/debited alongside this row, if any.
    pub bank_account_id: Option<Uuid>,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Receivable that settled into this row.
    #[sea_orm(
        belongs_to = "super::receivables::Entity",
        from = "Column::ReceivableId",
        to = "super::receivables::Column::Id"
    )]
    Receivables,
    /// Payable this payment belongs to.
    #[sea_orm(
        belongs_to = "super::payables::Entity",
        from = "Column::PayableId",
        to = "super::payables::Column::Id"
    )]
    Payables,
    /// Session this revenue was drawered under.
    #[sea_orm(
        belongs_to = "super::cash_register_sessions::Entity",
        from = "Column::CashSessionId",
        to = "super::cash_register_sessions::Column::Id"
    )]
    CashRegisterSessions,
}

impl Related<super::receivables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receivables.def()
    }
}

impl Related<super::payables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
