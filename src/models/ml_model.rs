//! # ML Model Catalog
//!
//! Registered models with their input/output modality and per-request cost.
//! The cost function lives here so callers never hardcode pricing.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Input modality accepted by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "model_input_type", rename_all = "snake_case")]
pub enum ModelInputType {
    Text,
    Image,
    Tabular,
    Audio,
}

/// Output modality produced by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "model_output_type", rename_all = "snake_case")]
pub enum ModelOutputType {
    Classification,
    Regression,
    Generation,
    Detection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MlModel {
    pub id: i64,
    pub name: String,
    pub version: String,
    pub input_type: ModelInputType,
    pub output_type: ModelOutputType,
    pub cost_per_request: BigDecimal,
    pub description: Option<String>,
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New model for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMlModel {
    pub name: String,
    pub version: String,
    pub input_type: ModelInputType,
    pub output_type: ModelOutputType,
    pub cost_per_request: BigDecimal,
    pub description: Option<String>,
    pub config: serde_json::Value,
}

impl MlModel {
    /// Cost of `requests_count` invocations at the configured per-request rate
    pub fn calculate_cost(&self, requests_count: i64) -> BigDecimal {
        &self.cost_per_request * BigDecimal::from(requests_count)
    }

    /// Validate a `major.minor.patch` version string
    pub fn validate_version(version: &str) -> bool {
        let parts: Vec<&str> = version.split('.').collect();
        parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    }

    /// Create a new model
    pub async fn create(pool: &PgPool, new_model: NewMlModel) -> Result<MlModel, sqlx::Error> {
        sqlx::query_as::<_, MlModel>(
            r#"
            INSERT INTO ml_models (name, version, input_type, output_type, cost_per_request,
                                   description, config, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING id, name, version, input_type, output_type, cost_per_request,
                      description, config, created_at, updated_at
            "#,
        )
        .bind(&new_model.name)
        .bind(&new_model.version)
        .bind(new_model.input_type)
        .bind(new_model.output_type)
        .bind(&new_model.cost_per_request)
        .bind(&new_model.description)
        .bind(&new_model.config)
        .fetch_one(pool)
        .await
    }

    /// Find a model by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<MlModel>, sqlx::Error> {
        sqlx::query_as::<_, MlModel>(
            r#"
            SELECT id, name, version, input_type, output_type, cost_per_request,
                   description, config, created_at, updated_at
            FROM ml_models
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List models, newest first
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<MlModel>, sqlx::Error> {
        sqlx::query_as::<_, MlModel>(
            r#"
            SELECT id, name, version, input_type, output_type, cost_per_request,
                   description, config, created_at, updated_at
            FROM ml_models
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// List models accepting the given input modality
    pub async fn list_by_input_type(
        pool: &PgPool,
        input_type: ModelInputType,
        limit: i64,
    ) -> Result<Vec<MlModel>, sqlx::Error> {
        sqlx::query_as::<_, MlModel>(
            r#"
            SELECT id, name, version, input_type, output_type, cost_per_request,
                   description, config, created_at, updated_at
            FROM ml_models
            WHERE input_type = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(input_type)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_calculate_cost() {
        let model = test_model();
        assert_eq!(
            model.calculate_cost(1),
            BigDecimal::from_str("0.001").unwrap()
        );
        assert_eq!(
            model.calculate_cost(5),
            BigDecimal::from_str("0.005").unwrap()
        );
    }

    #[test]
    fn test_validate_version() {
        assert!(MlModel::validate_version("1.0.0"));
        assert!(MlModel::validate_version("12.34.56"));
        assert!(!MlModel::validate_version("1.0"));
        assert!(!MlModel::validate_version("1.0.x"));
        assert!(!MlModel::validate_version("1..0"));
    }

    fn test_model() -> MlModel {
        MlModel {
            id: 1,
            name: "sentiment".to_string(),
            version: "1.0.0".to_string(),
            input_type: ModelInputType::Text,
            output_type: ModelOutputType::Classification,
            cost_per_request: BigDecimal::from_str("0.001").unwrap(),
            description: None,
            config: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
