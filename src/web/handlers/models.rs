//! # Model Catalog Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::models::{MlModel, ModelInputType, ModelOutputType, NewMlModel};
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateModelRequest {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub input_type: ModelInputType,
    pub output_type: ModelOutputType,
    pub cost_per_request: Option<BigDecimal>,
    pub description: Option<String>,
    #[serde(default)]
    pub config: serde_json::Value,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ModelListQuery {
    pub input_type: Option<ModelInputType>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Register a model: POST /v1/models
pub async fn create_model(
    State(state): State<AppState>,
    Json(request): Json<CreateModelRequest>,
) -> ApiResult<(StatusCode, Json<MlModel>)> {
    let cost_per_request = match request.cost_per_request {
        Some(cost) => cost,
        None => BigDecimal::from_str("0.001").map_err(|_| ApiError::Internal)?,
    };

    let config = if request.config.is_null() {
        serde_json::json!({})
    } else {
        request.config
    };

    let model = state
        .models
        .create(NewMlModel {
            name: request.name,
            version: request.version,
            input_type: request.input_type,
            output_type: request.output_type,
            cost_per_request,
            description: request.description,
            config,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(model)))
}

/// Fetch a model: GET /v1/models/{id}
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MlModel>> {
    let model = state.models.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(model))
}

/// List models, optionally filtered by input modality: GET /v1/models
pub async fn list_models(
    State(state): State<AppState>,
    Query(query): Query<ModelListQuery>,
) -> ApiResult<Json<Vec<MlModel>>> {
    let models = match query.input_type {
        Some(input_type) => {
            state
                .models
                .list_by_input_type(input_type, query.limit)
                .await?
        }
        None => state.models.list(query.limit).await?,
    };

    Ok(Json(models))
}
