//! `SeaORM` Entity for the bank_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BankTransactionStatus;

/// One normalized line from an imported bank statement.
///
/// The unique natural key (account, date, amount, description) protects
/// against re-importing the same line; `matched_transaction_id` is unique
/// so a financial transaction pairs with at most one line.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_transactions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Account the statement belongs to.
    pub bank_account_id: Uuid,
    /// Calendar date of the movement.
    pub transaction_date: Date,
    /// Statement description.
    pub description: String,
    /// Signed amount: positive = credit, negative = debit.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    /// Unmatched or matched.
    pub status: BankTransactionStatus,
    /// The financial transaction this line was paired with.
    pub matched_transaction_id: Option<Uuid>,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Parent bank account.
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
    /// Paired financial transaction.
    #[sea_orm(
        belongs_to = "super::financial_transactions::Entity",
        from = "Column::MatchedTransactionId",
        to = "super::financial_transactions::Column::Id"
    )]
    FinancialTransactions,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::financial_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
