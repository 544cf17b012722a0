//! # Transaction Handlers
//!
//! Deposits, withdrawals, and transaction history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bigdecimal::BigDecimal;
use serde::Deserialize;

use super::users::LimitQuery;
use crate::models::Transaction;
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub amount: BigDecimal,
    pub description: Option<String>,
}

/// Credit an account: POST /v1/users/{id}/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<MovementRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = state
        .transactions
        .deposit(user_id, request.amount, request.description)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Debit an account: POST /v1/users/{id}/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<MovementRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = state
        .transactions
        .withdraw(user_id, request.amount, request.description)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Transaction history, newest first: GET /v1/users/{id}/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.transactions.list_for_user(user_id, query.limit).await?;
    Ok(Json(transactions))
}
