//! Router assembly: resource routes plus CORS and request tracing layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{chat, health, models, predictions, transactions, users};
use super::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Accounts
        .route("/v1/users", post(users::register))
        .route("/v1/auth/login", post(users::login))
        .route(
            "/v1/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::deactivate_user),
        )
        .route("/v1/users/{id}/actions", get(users::list_actions))
        // Billing
        .route("/v1/users/{id}/deposit", post(transactions::deposit))
        .route("/v1/users/{id}/withdraw", post(transactions::withdraw))
        .route("/v1/users/{id}/transactions", get(transactions::list_transactions))
        // Model catalog
        .route("/v1/models", post(models::create_model).get(models::list_models))
        .route("/v1/models/{id}", get(models::get_model))
        // Predictions
        .route("/v1/predictions", post(predictions::create_prediction))
        .route("/v1/predictions/pending", get(predictions::list_pending))
        .route("/v1/predictions/{id}", get(predictions::get_prediction))
        .route("/v1/users/{id}/predictions", get(predictions::list_user_predictions))
        .route(
            "/v1/users/{id}/predictions/stats",
            get(predictions::user_prediction_stats),
        )
        // Chat
        .route("/v1/chat/messages", post(chat::send_message))
        .route(
            "/v1/chat/history",
            get(chat::get_history).delete(chat::clear_history),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
