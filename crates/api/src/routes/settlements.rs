//! Settlement routes: sale intake into the ledger.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error_response;
use super::receivables::ReceivableResponse;
use crate::AppState;
use fluxo_core::settlement::PaymentMethod as CorePaymentMethod;
use fluxo_db::entities::sea_orm_active_enums::{PaymentMethod, SaleStatus};
use fluxo_db::entities::sales;
use fluxo_db::repositories::{CreateSettlementInput, SettlementRepository};
use fluxo_shared::AppError;

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settlements", post(create_settlement))
        .route("/sales/{id}/cancel", post(cancel_sale))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a settlement.
#[derive(Debug, Deserialize)]
pub struct CreateSettlementRequest {
    /// Total amount of the sale.
    pub sale_total: String,
    /// Calendar date of the sale (YYYY-MM-DD); today when omitted.
    pub sale_date: Option<NaiveDate>,
    /// Payment method.
    pub method: PaymentMethod,
    /// Number of installments.
    #[serde(default = "default_installments")]
    pub installments: u32,
    /// Explicit payment config override.
    pub payment_config_id: Option<Uuid>,
    /// Customer the receivables belong to.
    pub customer_id: Option<Uuid>,
    /// Terminal the sale happened on.
    pub terminal_id: Option<Uuid>,
}

fn default_installments() -> u32 {
    1
}

/// Response for a sale.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    /// Sale ID.
    pub id: Uuid,
    /// Customer ID.
    pub customer_id: Option<Uuid>,
    /// Sale total.
    pub total: String,
    /// Sale date.
    pub sale_date: String,
    /// Payment method.
    pub method: String,
    /// Number of installments.
    pub installments: i32,
    /// Lifecycle status.
    pub status: &'static str,
}

impl SaleResponse {
    /// Builds the response from a stored sale row.
    #[must_use]
    pub fn from_model(model: &sales::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            total: model.total.to_string(),
            sale_date: model.sale_date.to_string(),
            method: CorePaymentMethod::from(model.method.clone()).to_string(),
            installments: model.installments,
            status: match model.status {
                SaleStatus::Completed => "completed",
                SaleStatus::Cancelled => "cancelled",
            },
        }
    }
}

/// Response for a created settlement.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    /// The persisted sale.
    pub sale: SaleResponse,
    /// One receivable per installment.
    pub receivables: Vec<ReceivableResponse>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/settlements` - Create the settlement for a sale.
async fn create_settlement(
    State(state): State<AppState>,
    Json(request): Json<CreateSettlementRequest>,
) -> impl IntoResponse {
    let Ok(sale_total) = Decimal::from_str(&request.sale_total) else {
        return error_response(AppError::Validation(format!(
            "Invalid sale_total: {}",
            request.sale_total
        )));
    };

    let repo = SettlementRepository::new((*state.db).clone());
    let input = CreateSettlementInput {
        customer_id: request.customer_id,
        sale_total,
        sale_date: request.sale_date.unwrap_or_else(|| Utc::now().date_naive()),
        method: request.method,
        installments: request.installments,
        payment_config_id: request.payment_config_id,
        terminal_id: request.terminal_id,
    };

    match repo.create_settlement(input).await {
        Ok(result) => {
            let today = Utc::now().date_naive();
            let response = SettlementResponse {
                sale: SaleResponse::from_model(&result.sale),
                receivables: result
                    .receivables
                    .iter()
                    .map(|model| ReceivableResponse::from_model(model, today))
                    .collect(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/sales/{id}/cancel` - Cancel a sale and its open receivables.
async fn cancel_sale(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone());
    match repo.cancel_sale(id).await {
        Ok(sale) => (StatusCode::OK, Json(SaleResponse::from_model(&sale))).into_response(),
        Err(e) => error_response(e.into()),
    }
}
