//! Financial transaction routes.
//!
//! The realized ledger read surface: cash-flow reporting and the
//! reconciliation matcher's candidate pool both read from here.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error_response;
use crate::AppState;
use fluxo_db::entities::financial_transactions;
use fluxo_db::entities::sea_orm_active_enums::{TransactionCategory, TransactionKind};
use fluxo_db::repositories::{FinancialTransactionRepository, TransactionFilter};
use fluxo_shared::types::{PageRequest, PageResponse};

/// Creates the financial transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing financial transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by direction.
    pub kind: Option<TransactionKind>,
    /// Filter by category.
    pub category: Option<TransactionCategory>,
    /// Date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Response for a realized financial transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Revenue or expense.
    pub kind: TransactionKind,
    /// Realized amount.
    pub amount: String,
    /// Realization date.
    pub date: String,
    /// Reporting category.
    pub category: TransactionCategory,
    /// Description.
    pub description: String,
    /// Originating receivable, if any.
    pub receivable_id: Option<Uuid>,
    /// Originating payable, if any.
    pub payable_id: Option<Uuid>,
    /// Cash session the revenue was drawered under, if any.
    pub cash_session_id: Option<Uuid>,
    /// Bank account credited/debited alongside, if any.
    pub bank_account_id: Option<Uuid>,
}

impl TransactionResponse {
    /// Builds the response from a stored row.
    #[must_use]
    pub fn from_model(model: &financial_transactions::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind.clone(),
            amount: model.amount.to_string(),
            date: model.transaction_date.to_string(),
            category: model.category.clone(),
            description: model.description.clone(),
            receivable_id: model.receivable_id,
            payable_id: model.payable_id,
            cash_session_id: model.cash_session_id,
            bank_account_id: model.bank_account_id,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List realized financial transactions.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = FinancialTransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        kind: query.kind,
        category: query.category,
        date_from: query.from,
        date_to: query.to,
    };
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo.list(filter, &page).await {
        Ok((items, total)) => {
            let transactions: Vec<TransactionResponse> =
                items.iter().map(TransactionResponse::from_model).collect();
            let response = PageResponse::new(transactions, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}
