//! Bank account and reconciliation routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::error_response;
use super::transactions::TransactionResponse;
use crate::AppState;
use fluxo_core::reconciliation::StatementLine;
use fluxo_db::entities::bank_accounts;
use fluxo_db::entities::bank_transactions;
use fluxo_db::entities::sea_orm_active_enums::{BankTransactionStatus, TransactionCategory};
use fluxo_db::repositories::{BankRepository, CreateAndMatchInput};
use fluxo_shared::AppError;

/// Creates the bank routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bank-accounts", post(create_account))
        .route("/bank-accounts/{id}", get(get_account))
        .route("/bank-accounts/{id}/statement", post(import_statement))
        .route("/bank-transactions", get(list_transactions))
        .route("/bank-transactions/{id}/match", post(match_transaction))
        .route(
            "/bank-transactions/{id}/create-and-match",
            post(create_and_match),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a bank account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub name: String,
    /// Starting balance; zero when omitted.
    pub initial_balance: Option<String>,
}

/// One statement line in an import request.
#[derive(Debug, Deserialize)]
pub struct StatementLineRequest {
    /// Calendar date of the movement (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Statement description.
    pub description: String,
    /// Textual amount, signed, comma or dot decimals.
    pub amount: String,
}

/// Request body for importing a statement.
#[derive(Debug, Deserialize)]
pub struct ImportStatementRequest {
    /// The statement lines.
    pub records: Vec<StatementLineRequest>,
}

/// Query parameters for listing imported bank transactions.
#[derive(Debug, Deserialize)]
pub struct ListBankTransactionsQuery {
    /// Filter by account.
    pub bank_account_id: Option<Uuid>,
    /// Filter by match status.
    pub status: Option<BankTransactionStatus>,
}

/// Request body for matching a bank transaction.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// The financial transaction to pair with.
    pub financial_transaction_id: Uuid,
}

/// Request body for create-and-match.
#[derive(Debug, Deserialize)]
pub struct CreateAndMatchRequest {
    /// Reporting category; bank fees when omitted.
    pub category: Option<TransactionCategory>,
    /// Description override; the statement text when omitted.
    pub description: Option<String>,
}

/// Response for a bank account.
#[derive(Debug, Serialize)]
pub struct BankAccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current balance.
    pub current_balance: String,
}

impl BankAccountResponse {
    /// Builds the response from a stored account row.
    #[must_use]
    pub fn from_model(model: &bank_accounts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            current_balance: model.current_balance.to_string(),
        }
    }
}

/// Response for an imported bank transaction.
#[derive(Debug, Serialize)]
pub struct BankTransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Account ID.
    pub bank_account_id: Uuid,
    /// Movement date.
    pub date: String,
    /// Statement description.
    pub description: String,
    /// Signed amount.
    pub amount: String,
    /// `unmatched` or `matched`.
    pub status: &'static str,
    /// The paired financial transaction, once matched.
    pub matched_transaction_id: Option<Uuid>,
}

impl BankTransactionResponse {
    /// Builds the response from a stored row.
    #[must_use]
    pub fn from_model(model: &bank_transactions::Model) -> Self {
        Self {
            id: model.id,
            bank_account_id: model.bank_account_id,
            date: model.transaction_date.to_string(),
            description: model.description.clone(),
            amount: model.amount.to_string(),
            status: match model.status {
                BankTransactionStatus::Unmatched => "unmatched",
                BankTransactionStatus::Matched => "matched",
            },
            matched_transaction_id: model.matched_transaction_id,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/bank-accounts` - Create a bank account.
async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let initial_balance = match &request.initial_balance {
        Some(raw) => match Decimal::from_str(raw) {
            Ok(value) => value,
            Err(_) => {
                return error_response(AppError::Validation(format!(
                    "Invalid initial_balance: {raw}"
                )));
            }
        },
        None => Decimal::ZERO,
    };

    let repo = BankRepository::new((*state.db).clone());
    match repo.create_account(request.name, initial_balance).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(BankAccountResponse::from_model(&model)),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET `/bank-accounts/{id}` - Get a bank account.
async fn get_account(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    match repo.get_account(id).await {
        Ok(model) => (StatusCode::OK, Json(BankAccountResponse::from_model(&model)))
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/bank-accounts/{id}/statement` - Import a statement.
async fn import_statement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ImportStatementRequest>,
) -> impl IntoResponse {
    let lines: Vec<StatementLine> = request
        .records
        .into_iter()
        .map(|record| StatementLine {
            date: record.date,
            description: record.description,
            amount: record.amount,
        })
        .collect();

    let repo = BankRepository::new((*state.db).clone());
    match repo.import_statement(id, lines).await {
        Ok(outcome) => {
            let imported: Vec<BankTransactionResponse> = outcome
                .imported
                .iter()
                .map(BankTransactionResponse::from_model)
                .collect();
            (
                StatusCode::CREATED,
                Json(json!({
                    "imported": imported,
                    "skipped_duplicates": outcome.skipped_duplicates
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/bank-transactions` - List imported bank transactions.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListBankTransactionsQuery>,
) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    match repo
        .list_transactions(query.bank_account_id, query.status)
        .await
    {
        Ok(items) => {
            let transactions: Vec<BankTransactionResponse> = items
                .iter()
                .map(BankTransactionResponse::from_model)
                .collect();
            (
                StatusCode::OK,
                Json(json!({ "bank_transactions": transactions })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/bank-transactions/{id}/match` - Pair a line with an existing
/// financial transaction.
async fn match_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MatchRequest>,
) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    match repo
        .match_transaction(id, request.financial_transaction_id)
        .await
    {
        Ok(model) => (
            StatusCode::OK,
            Json(BankTransactionResponse::from_model(&model)),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/bank-transactions/{id}/create-and-match` - Materialize a
/// financial transaction from the line and pair them.
async fn create_and_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateAndMatchRequest>,
) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    let input = CreateAndMatchInput {
        category: request.category,
        description: request.description,
    };

    match repo.create_and_match(id, input).await {
        Ok((bank_tx, financial_tx)) => (
            StatusCode::CREATED,
            Json(json!({
                "bank_transaction": BankTransactionResponse::from_model(&bank_tx),
                "financial_transaction": TransactionResponse::from_model(&financial_tx),
            })),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}
