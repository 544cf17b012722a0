//! # Model Catalog Service
//!
//! CRUD over registered ML models plus the [`ModelCatalog`] seam the
//! orchestrator looks models up through when computing request cost.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ServiceError, StoreError};
use crate::models::{MlModel, ModelInputType, NewMlModel};

/// Lookup seam consumed by the orchestrator
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn find_model(&self, model_id: i64) -> Result<Option<MlModel>, StoreError>;
}

#[derive(Clone)]
pub struct ModelService {
    pool: PgPool,
}

impl ModelService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_model: NewMlModel) -> Result<MlModel, ServiceError> {
        if new_model.name.trim().is_empty() {
            return Err(ServiceError::Validation("model name cannot be empty".into()));
        }
        if !MlModel::validate_version(&new_model.version) {
            return Err(ServiceError::Validation(format!(
                "invalid version '{}': expected major.minor.patch",
                new_model.version
            )));
        }

        Ok(MlModel::create(&self.pool, new_model).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<MlModel>, ServiceError> {
        Ok(MlModel::find_by_id(&self.pool, id).await?)
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<MlModel>, ServiceError> {
        Ok(MlModel::list(&self.pool, limit).await?)
    }

    pub async fn list_by_input_type(
        &self,
        input_type: ModelInputType,
        limit: i64,
    ) -> Result<Vec<MlModel>, ServiceError> {
        Ok(MlModel::list_by_input_type(&self.pool, input_type, limit).await?)
    }
}

#[async_trait]
impl ModelCatalog for ModelService {
    async fn find_model(&self, model_id: i64) -> Result<Option<MlModel>, StoreError> {
        Ok(MlModel::find_by_id(&self.pool, model_id).await?)
    }
}
