//! `SeaORM` Entity for the cash_movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::MovementDirection;

/// A sangria (out) or suprimento (in) tied to an open session.
///
/// Append-only; movements never carry running balances.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_movements")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The session this movement belongs to.
    pub session_id: Uuid,
    /// Cash in or cash out.
    pub direction: MovementDirection,
    /// Amount moved (always positive).
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    /// Why the cash moved.
    pub reason: String,
    /// When the movement was recorded.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Parent session.
    #[sea_orm(
        belongs_to = "super::cash_register_sessions::Entity",
        from = "Column::SessionId",
        to = "super::cash_register_sessions::Column::Id"
    )]
    CashRegisterSessions,
}

impl Related<super::cash_register_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashRegisterSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
