//! # Chat Handlers
//!
//! A thin JSON conversation surface over the orchestrator: each message
//! runs one prediction against the configured chat model and both sides of
//! the exchange land in the caller's session history.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::models::RequestType;
use crate::orchestration::PredictionInput;
use crate::services::ChatEntry;
use crate::state_machine::RequestStatus;
use crate::web::auth::AuthUser;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub answer: String,
    pub request_id: i64,
}

/// Send a chat message: POST /v1/chat/messages
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<ChatMessageRequest>,
) -> ApiResult<Json<ChatMessageResponse>> {
    state
        .sessions
        .append(user_id, ChatEntry::user(request.text.clone()))
        .await;

    let record = state
        .orchestrator
        .process_prediction_request(PredictionInput {
            user_id,
            model_id: state.config.chat_model_id,
            input_data: request.text,
            request_type: RequestType::Prediction,
            timeout: Duration::from_secs(state.config.default_timeout_seconds),
        })
        .await?;

    if record.status != RequestStatus::Completed {
        warn!(
            request_id = record.id,
            user_id,
            "Chat prediction failed worker-side"
        );
        return Err(ApiError::Internal);
    }

    let answer = record.output_data.clone().unwrap_or_default();

    state
        .sessions
        .append(user_id, ChatEntry::assistant(answer.clone()))
        .await;

    Ok(Json(ChatMessageResponse {
        answer,
        request_id: record.id,
    }))
}

/// Fetch own chat history: GET /v1/chat/history
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<ChatEntry>>> {
    Ok(Json(state.sessions.history(user_id).await))
}

/// Drop own chat history: DELETE /v1/chat/history
pub async fn clear_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<StatusCode> {
    state.sessions.clear(user_id).await;
    Ok(StatusCode::NO_CONTENT)
}
