//! `SeaORM` Entity for the receivables table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, ReceivableStatus};

/// One scheduled incoming money movement (an installment of a sale).
///
/// Never deleted while its sale exists; cancellation is a status
/// transition. `payment_config_id` is nulled when the config is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "receivables")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Parent sale.
    pub sale_id: Uuid,
    /// Optional customer.
    pub customer_id: Option<Uuid>,
    /// This installment's share of the sale total.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub gross_amount: Decimal,
    /// Provider fee retained.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub fee_amount: Decimal,
    /// Amount actually collected (`gross - fee`).
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub net_amount: Decimal,
    /// Date the funds liquidate.
    pub due_date: Date,
    /// 1-based installment position.
    pub installment_number: i32,
    /// Total installments in the settlement.
    pub total_installments: i32,
    /// Stored lifecycle status (overdue is derived at read time).
    pub status: ReceivableStatus,
    /// Payment method of the sale.
    pub method: PaymentMethod,
    /// Originating config; nulled if the config is deleted.
    pub payment_config_id: Option<Uuid>,
    /// Date the receivable settled.
    pub paid_date: Option<Date>,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Parent sale.
    #[sea_orm(
        belongs_to = "super::sales::Entity",
        from = "Column::SaleId",
        to = "super::sales::Column::Id"
    )]
    Sales,
    /// Originating payment method config.
    #[sea_orm(
        belongs_to = "super::payment_method_configs::Entity",
        from = "Column::PaymentConfigId",
        to = "super::payment_method_configs::Column::Id"
    )]
    PaymentMethodConfigs,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::payment_method_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethodConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
