//! Cash-register session routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error_response;
use crate::AppState;
use fluxo_db::entities::cash_movements;
use fluxo_db::entities::cash_register_sessions;
use fluxo_db::entities::sea_orm_active_enums::{CashSessionStatus, MovementDirection};
use fluxo_db::repositories::{CashSessionRepository, SessionReport};
use fluxo_shared::AppError;

/// Creates the cash session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-sessions", post(open_session))
        .route("/cash-sessions/{id}/sangria", post(sangria))
        .route("/cash-sessions/{id}/suprimento", post(suprimento))
        .route("/cash-sessions/{id}/report", get(report))
        .route("/cash-sessions/{id}/close", post(close_session))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for opening a session.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    /// Terminal the drawer belongs to.
    pub terminal_id: Uuid,
    /// Operator opening the drawer.
    pub operator_id: Uuid,
    /// Cash counted into the drawer at open.
    pub opening_balance: String,
}

/// Request body for a sangria (cash withdrawal).
#[derive(Debug, Deserialize)]
pub struct SangriaRequest {
    /// Amount withdrawn.
    pub amount: String,
    /// Why the cash left the drawer.
    pub reason: String,
}

/// Request body for a suprimento (cash supply).
#[derive(Debug, Deserialize)]
pub struct SuprimentoRequest {
    /// Amount supplied.
    pub amount: String,
    /// Why the cash entered the drawer.
    pub reason: Option<String>,
}

/// Request body for closing a session.
#[derive(Debug, Deserialize)]
pub struct CloseSessionRequest {
    /// Cash physically counted at close.
    pub closing_balance: String,
}

/// Response for a session row.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Terminal ID.
    pub terminal_id: Uuid,
    /// Operator ID.
    pub operator_id: Uuid,
    /// Open timestamp.
    pub opened_at: String,
    /// Close timestamp.
    pub closed_at: Option<String>,
    /// Opening balance.
    pub opening_balance: String,
    /// Counted closing balance.
    pub closing_balance: Option<String>,
    /// Status.
    pub status: &'static str,
}

impl SessionResponse {
    /// Builds the response from a stored session row.
    #[must_use]
    pub fn from_model(model: &cash_register_sessions::Model) -> Self {
        Self {
            id: model.id,
            terminal_id: model.terminal_id,
            operator_id: model.operator_id,
            opened_at: model.opened_at.to_rfc3339(),
            closed_at: model.closed_at.map(|t| t.to_rfc3339()),
            opening_balance: model.opening_balance.to_string(),
            closing_balance: model.closing_balance.map(|b| b.to_string()),
            status: match model.status {
                CashSessionStatus::Open => "open",
                CashSessionStatus::Closed => "closed",
            },
        }
    }
}

/// Response for a recorded movement.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Movement ID.
    pub id: Uuid,
    /// `sangria` or `suprimento`.
    pub kind: &'static str,
    /// Amount moved.
    pub amount: String,
    /// Reason.
    pub reason: String,
    /// When it was recorded.
    pub created_at: String,
}

impl MovementResponse {
    /// Builds the response from a stored movement row.
    #[must_use]
    pub fn from_model(model: &cash_movements::Model) -> Self {
        Self {
            id: model.id,
            kind: match model.direction {
                MovementDirection::In => "suprimento",
                MovementDirection::Out => "sangria",
            },
            amount: model.amount.to_string(),
            reason: model.reason.clone(),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response for a session report.
#[derive(Debug, Serialize)]
pub struct SessionReportResponse {
    /// The session row.
    pub session: SessionResponse,
    /// Movements recorded during the session.
    pub movements: Vec<MovementResponse>,
    /// Cash-settled sale revenue attributed to the session.
    pub cash_sales: String,
    /// Total suprimentos.
    pub supplies: String,
    /// Total sangrias.
    pub withdrawals: String,
    /// The balance the drawer should hold.
    pub expected_balance: String,
    /// `closing - expected`, present once closed. Surfaced as data - the
    /// system never corrects a discrepancy.
    pub difference: Option<String>,
}

impl SessionReportResponse {
    /// Builds the response from a repository report.
    #[must_use]
    pub fn from_report(report: &SessionReport) -> Self {
        Self {
            session: SessionResponse::from_model(&report.session),
            movements: report
                .movements
                .iter()
                .map(MovementResponse::from_model)
                .collect(),
            cash_sales: report.breakdown.cash_sales.to_string(),
            supplies: report.breakdown.supplies.to_string(),
            withdrawals: report.breakdown.withdrawals.to_string(),
            expected_balance: report.expected_balance.to_string(),
            difference: report.difference.map(|d| d.to_string()),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/cash-sessions` - Open a session for a terminal.
async fn open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> impl IntoResponse {
    let Ok(opening_balance) = Decimal::from_str(&request.opening_balance) else {
        return error_response(AppError::Validation(format!(
            "Invalid opening_balance: {}",
            request.opening_balance
        )));
    };

    let repo = CashSessionRepository::new((*state.db).clone());
    match repo
        .open(request.terminal_id, request.operator_id, opening_balance)
        .await
    {
        Ok(model) => (StatusCode::CREATED, Json(SessionResponse::from_model(&model)))
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/cash-sessions/{id}/sangria` - Withdraw cash from the drawer.
async fn sangria(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SangriaRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&request.amount) else {
        return error_response(AppError::Validation(format!(
            "Invalid amount: {}",
            request.amount
        )));
    };

    let repo = CashSessionRepository::new((*state.db).clone());
    match repo.sangria(id, amount, request.reason).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(MovementResponse::from_model(&model)),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/cash-sessions/{id}/suprimento` - Supply cash into the drawer.
async fn suprimento(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SuprimentoRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&request.amount) else {
        return error_response(AppError::Validation(format!(
            "Invalid amount: {}",
            request.amount
        )));
    };

    let repo = CashSessionRepository::new((*state.db).clone());
    match repo.suprimento(id, amount, request.reason).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(MovementResponse::from_model(&model)),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET `/cash-sessions/{id}/report` - Report a session's balances.
async fn report(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CashSessionRepository::new((*state.db).clone());
    match repo.report(id).await {
        Ok(session_report) => (
            StatusCode::OK,
            Json(SessionReportResponse::from_report(&session_report)),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/cash-sessions/{id}/close` - Close a session against the counted
/// balance.
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CloseSessionRequest>,
) -> impl IntoResponse {
    let Ok(closing_balance) = Decimal::from_str(&request.closing_balance) else {
        return error_response(AppError::Validation(format!(
            "Invalid closing_balance: {}",
            request.closing_balance
        )));
    };

    let repo = CashSessionRepository::new((*state.db).clone());
    match repo.close(id, closing_balance).await {
        Ok(session_report) => (
            StatusCode::OK,
            Json(SessionReportResponse::from_report(&session_report)),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}
