//! `SeaORM` Entity for the payables table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PayableStatus, TransactionCategory};

/// One scheduled outgoing money movement (an expense obligation).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payables")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// What this obligation is for.
    pub description: String,
    /// Total amount owed.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    /// Date the obligation falls due.
    pub due_date: Date,
    /// Expense category.
    pub category: TransactionCategory,
    /// Stored lifecycle status (overdue is derived at read time).
    pub status: PayableStatus,
    /// Running total paid across partial payments.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_paid: Decimal,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
