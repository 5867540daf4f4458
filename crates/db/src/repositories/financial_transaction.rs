//! Financial transaction repository.
//!
//! Read-only surface: realized transactions are written by the settlement,
//! receivable, payable, and reconciliation paths, never directly.

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entities::{
    financial_transactions,
    sea_orm_active_enums::{TransactionCategory, TransactionKind},
};
use fluxo_shared::types::PageRequest;

/// Error types for financial transaction queries.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Financial transaction not found.
    #[error("Financial transaction not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing financial transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by direction.
    pub kind: Option<TransactionKind>,
    /// Filter by category.
    pub category: Option<TransactionCategory>,
    /// Date range start (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Date range end (inclusive).
    pub date_to: Option<NaiveDate>,
}

/// Repository for realized financial transactions.
#[derive(Debug, Clone)]
pub struct FinancialTransactionRepository {
    db: DatabaseConnection,
}

impl FinancialTransactionRepository {
    /// Creates a new financial transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists realized transactions - the matcher's candidate pool and the
    /// cash-flow read surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        filter: TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<financial_transactions::Model>, u64), TransactionError> {
        let mut query = financial_transactions::Entity::find();
        if let Some(kind) = filter.kind {
            query = query.filter(financial_transactions::Column::Kind.eq(kind));
        }
        if let Some(category) = filter.category {
            query = query.filter(financial_transactions::Column::Category.eq(category));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(financial_transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(financial_transactions::Column::TransactionDate.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(financial_transactions::Column::TransactionDate)
            .order_by_desc(financial_transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    /// Gets a realized transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs.
    pub async fn get(&self, id: Uuid) -> Result<financial_transactions::Model, TransactionError> {
        financial_transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }
}
