//! # User Handlers
//!
//! Registration, login, profile management, and the account audit trail.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{User, UserAction};
use crate::services::user_service::RegisterUser;
use crate::web::auth::AuthUser;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub balance: Option<BigDecimal>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Register a new account: POST /v1/users
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .users
        .register(RegisterUser {
            username: request.username,
            email: request.email,
            password: request.password,
            balance: request.balance.unwrap_or_else(|| BigDecimal::from(0)),
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a bearer token: POST /v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    let access_token = state
        .auth
        .generate_token(user.id)
        .map_err(|_| ApiError::Internal)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// Fetch an account: GET /v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = state.users.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// Update own profile: PATCH /v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    if auth_id != id {
        return Err(ApiError::Forbidden);
    }

    let user = state
        .users
        .update_profile(id, request.email, request.password)
        .await?;

    Ok(Json(user))
}

/// Deactivate own account: DELETE /v1/users/{id}
pub async fn deactivate_user(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if auth_id != id {
        return Err(ApiError::Forbidden);
    }

    state.users.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Account audit trail: GET /v1/users/{id}/actions
pub async fn list_actions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<UserAction>>> {
    let actions = state.users.actions(id, query.limit).await?;
    Ok(Json(actions))
}
