//! Payment method configuration routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::error_response;
use crate::AppState;
use fluxo_db::entities::payment_method_configs;
use fluxo_db::entities::sea_orm_active_enums::{PaymentMethod, ReceivableMode};
use fluxo_db::repositories::{CreatePaymentConfigInput, PaymentConfigRepository};
use fluxo_shared::AppError;

/// Creates the payment config routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payment-configs", get(list_configs))
        .route("/payment-configs", post(create_config))
        .route("/payment-configs/{id}", get(get_config))
        .route("/payment-configs/{id}", delete(delete_config))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a payment config.
#[derive(Debug, Deserialize)]
pub struct CreateConfigRequest {
    /// Payment method covered.
    pub method: PaymentMethod,
    /// Optional provider/acquirer label.
    pub provider: Option<String>,
    /// Bracket lower bound; 1 when omitted.
    #[serde(default = "default_bracket_bound")]
    pub min_installments: u32,
    /// Bracket upper bound; 1 when omitted.
    #[serde(default = "default_bracket_bound")]
    pub max_installments: u32,
    /// Fee percentage per installment share.
    pub fee_percent: String,
    /// Days until funds liquidate.
    pub days_to_liquidate: u32,
    /// Immediate or deferred realization.
    pub receivable_mode: ReceivableMode,
    /// Bank account credited automatically on settlement.
    pub bank_account_id: Option<Uuid>,
}

fn default_bracket_bound() -> u32 {
    1
}

/// Response for a payment config.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    /// Config ID.
    pub id: Uuid,
    /// Payment method covered.
    pub method: PaymentMethod,
    /// Provider label.
    pub provider: Option<String>,
    /// Bracket lower bound.
    pub min_installments: i32,
    /// Bracket upper bound.
    pub max_installments: i32,
    /// Fee percentage.
    pub fee_percent: String,
    /// Days until funds liquidate.
    pub days_to_liquidate: i32,
    /// Immediate or deferred.
    pub receivable_mode: ReceivableMode,
    /// Linked bank account.
    pub bank_account_id: Option<Uuid>,
    /// Active flag.
    pub is_active: bool,
}

impl ConfigResponse {
    /// Builds the response from a stored config row.
    #[must_use]
    pub fn from_model(model: &payment_method_configs::Model) -> Self {
        Self {
            id: model.id,
            method: model.method.clone(),
            provider: model.provider.clone(),
            min_installments: model.min_installments,
            max_installments: model.max_installments,
            fee_percent: model.fee_percent.to_string(),
            days_to_liquidate: model.days_to_liquidate,
            receivable_mode: model.receivable_mode.clone(),
            bank_account_id: model.bank_account_id,
            is_active: model.is_active,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/payment-configs` - List configs.
async fn list_configs(State(state): State<AppState>) -> impl IntoResponse {
    let repo = PaymentConfigRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(items) => {
            let configs: Vec<ConfigResponse> =
                items.iter().map(ConfigResponse::from_model).collect();
            (StatusCode::OK, Json(json!({ "payment_configs": configs }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/payment-configs` - Create a config.
async fn create_config(
    State(state): State<AppState>,
    Json(request): Json<CreateConfigRequest>,
) -> impl IntoResponse {
    let Ok(fee_percent) = Decimal::from_str(&request.fee_percent) else {
        return error_response(AppError::Validation(format!(
            "Invalid fee_percent: {}",
            request.fee_percent
        )));
    };

    let repo = PaymentConfigRepository::new((*state.db).clone());
    let input = CreatePaymentConfigInput {
        method: request.method,
        provider: request.provider,
        min_installments: request.min_installments,
        max_installments: request.max_installments,
        fee_percent,
        days_to_liquidate: request.days_to_liquidate,
        receivable_mode: request.receivable_mode,
        bank_account_id: request.bank_account_id,
    };

    match repo.create(input).await {
        Ok(model) => {
            (StatusCode::CREATED, Json(ConfigResponse::from_model(&model))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/payment-configs/{id}` - Get a config.
async fn get_config(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = PaymentConfigRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(model) => (StatusCode::OK, Json(ConfigResponse::from_model(&model))).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/payment-configs/{id}` - Delete a config.
///
/// Dependent receivables survive with their config reference nulled.
async fn delete_config(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = PaymentConfigRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
