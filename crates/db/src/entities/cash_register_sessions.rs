//! `SeaORM` Entity for the cash_register_sessions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CashSessionStatus;

/// One open/close cycle of a physical cash register.
///
/// A partial unique index allows at most one open session per terminal.
/// Closed sessions are immutable history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_register_sessions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The terminal this session belongs to.
    pub terminal_id: Uuid,
    /// The operator who opened the session.
    pub operator_id: Uuid,
    /// When the session opened.
    pub opened_at: DateTimeWithTimeZone,
    /// When the session closed (null while open).
    pub closed_at: Option<DateTimeWithTimeZone>,
    /// Cash in the drawer at open.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub opening_balance: Decimal,
    /// Counted cash at close (null while open).
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub closing_balance: Option<Decimal>,
    /// Computed expectation at close (null while open).
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub expected_balance: Option<Decimal>,
    /// `closing - expected` at close (null while open).
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub difference: Option<Decimal>,
    /// Open or closed.
    pub status: CashSessionStatus,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Sangrias and suprimentos recorded during the session.
    #[sea_orm(has_many = "super::cash_movements::Entity")]
    CashMovements,
}

impl Related<super::cash_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
