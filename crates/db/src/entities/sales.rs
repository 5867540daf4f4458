//! `SeaORM` Entity for the sales table.
//!
//! Minimal intake record: the settlement core owns the money movements,
//! not the cart. Item and inventory data live elsewhere.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, SaleStatus};

/// A completed sale that settlement turned into receivables.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Optional customer.
    pub customer_id: Option<Uuid>,
    /// Sale total.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total: Decimal,
    /// Calendar date of the sale.
    pub sale_date: Date,
    /// Payment method.
    pub method: PaymentMethod,
    /// Number of installments.
    pub installments: i32,
    /// Lifecycle status.
    pub status: SaleStatus,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Receivables scheduled for this sale.
    #[sea_orm(has_many = "super::receivables::Entity")]
    Receivables,
}

impl Related<super::receivables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receivables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
