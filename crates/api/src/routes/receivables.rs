//! Receivable routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::error_response;
use crate::AppState;
use fluxo_core::ledger::{DerivedReceivableStatus, LedgerService};
use fluxo_core::settlement::PaymentMethod as CorePaymentMethod;
use fluxo_db::entities::receivables;
use fluxo_db::entities::sea_orm_active_enums::{PaymentMethod, ReceivableStatus};
use fluxo_db::repositories::{ReceivableFilter, ReceivableRepository};

/// Creates the receivable routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receivables", get(list_receivables))
        .route("/receivables/{id}", get(get_receivable))
        .route("/receivables/{id}/receive", post(receive_receivable))
        .route("/receivables/{id}/cancel", post(cancel_receivable))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing receivables.
#[derive(Debug, Deserialize)]
pub struct ListReceivablesQuery {
    /// Filter by stored status.
    pub status: Option<ReceivableStatus>,
    /// Filter by payment method.
    pub method: Option<PaymentMethod>,
    /// Filter by parent sale.
    pub sale_id: Option<Uuid>,
    /// Due date range start (YYYY-MM-DD).
    pub due_from: Option<NaiveDate>,
    /// Due date range end (YYYY-MM-DD).
    pub due_to: Option<NaiveDate>,
}

/// Request body for receiving a receivable.
#[derive(Debug, Deserialize)]
pub struct ReceiveRequest {
    /// Calendar date of the payment; today when omitted.
    pub payment_date: Option<NaiveDate>,
}

/// Response for a receivable.
#[derive(Debug, Serialize)]
pub struct ReceivableResponse {
    /// Receivable ID.
    pub id: Uuid,
    /// Parent sale ID.
    pub sale_id: Uuid,
    /// Customer ID.
    pub customer_id: Option<Uuid>,
    /// Installment share of the sale total.
    pub gross_amount: String,
    /// Provider fee.
    pub fee_amount: String,
    /// Amount actually collected.
    pub net_amount: String,
    /// Due date.
    pub due_date: String,
    /// 1-based installment position.
    pub installment_number: i32,
    /// Total installments.
    pub total_installments: i32,
    /// Read-time status; overdue is derived from the due date.
    pub status: &'static str,
    /// Payment method.
    pub method: String,
    /// Originating config, if it still exists.
    pub payment_config_id: Option<Uuid>,
    /// Settlement date.
    pub paid_date: Option<String>,
}

impl ReceivableResponse {
    /// Builds the response from a stored row, deriving overdue.
    #[must_use]
    pub fn from_model(model: &receivables::Model, today: NaiveDate) -> Self {
        let derived = LedgerService::derived_receivable_status(
            model.status.clone().into(),
            model.due_date,
            today,
        );

        Self {
            id: model.id,
            sale_id: model.sale_id,
            customer_id: model.customer_id,
            gross_amount: model.gross_amount.to_string(),
            fee_amount: model.fee_amount.to_string(),
            net_amount: model.net_amount.to_string(),
            due_date: model.due_date.to_string(),
            installment_number: model.installment_number,
            total_installments: model.total_installments,
            status: derived_status_label(derived),
            method: CorePaymentMethod::from(model.method.clone()).to_string(),
            payment_config_id: model.payment_config_id,
            paid_date: model.paid_date.map(|d| d.to_string()),
        }
    }
}

/// Maps the derived status to its wire label.
#[must_use]
pub fn derived_status_label(status: DerivedReceivableStatus) -> &'static str {
    match status {
        DerivedReceivableStatus::Pending => "pending",
        DerivedReceivableStatus::Overdue => "overdue",
        DerivedReceivableStatus::Paid => "paid",
        DerivedReceivableStatus::Cancelled => "cancelled",
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/receivables` - List receivables.
///
/// Side effect: matured immediate-mode receivables auto-settle before the
/// listing is built.
async fn list_receivables(
    State(state): State<AppState>,
    Query(query): Query<ListReceivablesQuery>,
) -> impl IntoResponse {
    let repo = ReceivableRepository::new((*state.db).clone());
    let filter = ReceivableFilter {
        status: query.status,
        method: query.method,
        sale_id: query.sale_id,
        due_from: query.due_from,
        due_to: query.due_to,
    };

    match repo.list(filter).await {
        Ok(items) => {
            let today = Utc::now().date_naive();
            let receivables: Vec<ReceivableResponse> = items
                .iter()
                .map(|model| ReceivableResponse::from_model(model, today))
                .collect();
            (StatusCode::OK, Json(json!({ "receivables": receivables }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/receivables/{id}` - Get a receivable.
async fn get_receivable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ReceivableRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(model) => {
            let today = Utc::now().date_naive();
            (
                StatusCode::OK,
                Json(ReceivableResponse::from_model(&model, today)),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/receivables/{id}/receive` - Settle a receivable.
async fn receive_receivable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReceiveRequest>,
) -> impl IntoResponse {
    let payment_date = request
        .payment_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let repo = ReceivableRepository::new((*state.db).clone());
    match repo.receive(id, payment_date).await {
        Ok(model) => {
            let today = Utc::now().date_naive();
            (
                StatusCode::OK,
                Json(ReceivableResponse::from_model(&model, today)),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/receivables/{id}/cancel` - Cancel a receivable.
async fn cancel_receivable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ReceivableRepository::new((*state.db).clone());
    match repo.cancel(id).await {
        Ok(model) => {
            let today = Utc::now().date_naive();
            (
                StatusCode::OK,
                Json(ReceivableResponse::from_model(&model, today)),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}
