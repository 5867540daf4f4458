//! API route definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use crate::AppState;
use fluxo_shared::AppError;

pub mod bank;
pub mod cash_sessions;
pub mod health;
pub mod payables;
pub mod payment_configs;
pub mod receivables;
pub mod settlements;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(settlements::routes())
        .merge(receivables::routes())
        .merge(payables::routes())
        .merge(cash_sessions::routes())
        .merge(bank::routes())
        .merge(transactions::routes())
        .merge(payment_configs::routes())
}

/// Maps an application error to a JSON error response.
///
/// Internal errors are logged and returned with a generic message; the
/// caller-facing taxonomy (validation, conflict, not-found, configuration)
/// carries the real reason.
pub(crate) fn error_response(error: AppError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(%error, "Internal error");
        "An error occurred".to_string()
    } else {
        error.to_string()
    };

    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": message
        })),
    )
        .into_response()
}
