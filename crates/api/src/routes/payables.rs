//! Payable routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::error_response;
use crate::AppState;
use fluxo_core::ledger::{DerivedPayableStatus, LedgerService};
use fluxo_db::entities::payables;
use fluxo_db::entities::sea_orm_active_enums::{
    PayableStatus, PaymentMethod, TransactionCategory,
};
use fluxo_db::repositories::{
    CreatePayableInput, PayPayableInput, PayableFilter, PayableRepository,
};
use fluxo_shared::AppError;

/// Creates the payable routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payables", get(list_payables))
        .route("/payables", post(create_payable))
        .route("/payables/{id}", get(get_payable))
        .route("/payables/{id}/pay", post(pay_payable))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing payables.
#[derive(Debug, Deserialize)]
pub struct ListPayablesQuery {
    /// Filter by stored status.
    pub status: Option<PayableStatus>,
    /// Filter by category.
    pub category: Option<TransactionCategory>,
    /// Due date range start (YYYY-MM-DD).
    pub due_from: Option<NaiveDate>,
    /// Due date range end (YYYY-MM-DD).
    pub due_to: Option<NaiveDate>,
}

/// Request body for creating a payable.
#[derive(Debug, Deserialize)]
pub struct CreatePayableRequest {
    /// What the obligation is for.
    pub description: String,
    /// Total amount owed.
    pub amount: String,
    /// Date the obligation falls due (YYYY-MM-DD).
    pub due_date: NaiveDate,
    /// Expense category.
    pub category: TransactionCategory,
}

/// Request body for paying a payable.
#[derive(Debug, Deserialize)]
pub struct PayPayableRequest {
    /// Amount to pay now.
    pub amount_paid: String,
    /// Calendar date of the payment; today when omitted.
    pub payment_date: Option<NaiveDate>,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Bank account to debit atomically.
    pub bank_account_id: Option<Uuid>,
}

/// Response for a payable.
#[derive(Debug, Serialize)]
pub struct PayableResponse {
    /// Payable ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Total amount owed.
    pub amount: String,
    /// Running total paid.
    pub total_paid: String,
    /// Remaining balance.
    pub remaining: String,
    /// Due date.
    pub due_date: String,
    /// Category.
    pub category: TransactionCategory,
    /// Read-time status; overdue is derived from the due date.
    pub status: &'static str,
}

impl PayableResponse {
    /// Builds the response from a stored row, deriving overdue.
    #[must_use]
    pub fn from_model(model: &payables::Model, today: NaiveDate) -> Self {
        let derived = LedgerService::derived_payable_status(
            model.status.clone().into(),
            model.due_date,
            today,
        );

        Self {
            id: model.id,
            description: model.description.clone(),
            amount: model.amount.to_string(),
            total_paid: model.total_paid.to_string(),
            remaining: (model.amount - model.total_paid).to_string(),
            due_date: model.due_date.to_string(),
            category: model.category.clone(),
            status: derived_status_label(derived),
        }
    }
}

/// Maps the derived status to its wire label.
#[must_use]
pub fn derived_status_label(status: DerivedPayableStatus) -> &'static str {
    match status {
        DerivedPayableStatus::Pending => "pending",
        DerivedPayableStatus::Partial => "partial",
        DerivedPayableStatus::Overdue => "overdue",
        DerivedPayableStatus::Paid => "paid",
        DerivedPayableStatus::Cancelled => "cancelled",
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/payables` - List payables.
async fn list_payables(
    State(state): State<AppState>,
    Query(query): Query<ListPayablesQuery>,
) -> impl IntoResponse {
    let repo = PayableRepository::new((*state.db).clone());
    let filter = PayableFilter {
        status: query.status,
        category: query.category,
        due_from: query.due_from,
        due_to: query.due_to,
    };

    match repo.list(filter).await {
        Ok(items) => {
            let today = Utc::now().date_naive();
            let payables: Vec<PayableResponse> = items
                .iter()
                .map(|model| PayableResponse::from_model(model, today))
                .collect();
            (StatusCode::OK, Json(json!({ "payables": payables }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/payables` - Create a payable.
async fn create_payable(
    State(state): State<AppState>,
    Json(request): Json<CreatePayableRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&request.amount) else {
        return error_response(AppError::Validation(format!(
            "Invalid amount: {}",
            request.amount
        )));
    };

    let repo = PayableRepository::new((*state.db).clone());
    let input = CreatePayableInput {
        description: request.description,
        amount,
        due_date: request.due_date,
        category: request.category,
    };

    match repo.create(input).await {
        Ok(model) => {
            let today = Utc::now().date_naive();
            (
                StatusCode::CREATED,
                Json(PayableResponse::from_model(&model, today)),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/payables/{id}` - Get a payable.
async fn get_payable(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = PayableRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(model) => {
            let today = Utc::now().date_naive();
            (
                StatusCode::OK,
                Json(PayableResponse::from_model(&model, today)),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/payables/{id}/pay` - Pay (part of) a payable.
async fn pay_payable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PayPayableRequest>,
) -> impl IntoResponse {
    let Ok(amount_paid) = Decimal::from_str(&request.amount_paid) else {
        return error_response(AppError::Validation(format!(
            "Invalid amount_paid: {}",
            request.amount_paid
        )));
    };

    let repo = PayableRepository::new((*state.db).clone());
    let input = PayPayableInput {
        amount_paid,
        payment_date: request
            .payment_date
            .unwrap_or_else(|| Utc::now().date_naive()),
        method: request.method,
        bank_account_id: request.bank_account_id,
    };

    match repo.pay(id, input).await {
        Ok(model) => {
            let today = Utc::now().date_naive();
            (
                StatusCode::OK,
                Json(PayableResponse::from_model(&model, today)),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}
