//! # User Service
//!
//! Account registration, authentication, profile and balance management.
//! Every mutating operation leaves a row in `user_actions`; audit failures
//! are logged but never fail the primary operation.

use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::warn;

use super::ServiceError;
use crate::models::{NewUser, User, UserAction};
use crate::utils::password;

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub balance: BigDecimal,
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, input: RegisterUser) -> Result<User, ServiceError> {
        if input.username.trim().is_empty() {
            return Err(ServiceError::Validation("username cannot be empty".into()));
        }
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(ServiceError::Validation("invalid email".into()));
        }
        if input.password.len() < 8 {
            return Err(ServiceError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }

        if User::exists_with_username_or_email(&self.pool, &input.username, &input.email).await? {
            return Err(ServiceError::Conflict("user already exists".into()));
        }

        let user = User::create(
            &self.pool,
            NewUser {
                username: input.username,
                email: input.email,
                password_hash: password::hash_password(&input.password),
                balance: input.balance,
            },
        )
        .await?;

        self.audit(user.id, "registration", None).await;
        Ok(user)
    }

    /// Verify credentials and return the account. Token minting is the web
    /// layer's job.
    pub async fn authenticate(&self, username: &str, pass: &str) -> Result<User, ServiceError> {
        let user = User::find_by_username(&self.pool, username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !user.is_active || !password::verify_password(pass, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        self.audit(user.id, "login", None).await;
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>, ServiceError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    pub async fn update_profile(
        &self,
        id: i64,
        email: Option<String>,
        new_password: Option<String>,
    ) -> Result<User, ServiceError> {
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(ServiceError::Validation("invalid email".into()));
            }
        }

        let password_hash = new_password.map(|p| password::hash_password(&p));

        let user = User::update_profile(&self.pool, id, email.as_deref(), password_hash.as_deref())
            .await?
            .ok_or(ServiceError::NotFound { entity: "user", id })?;

        self.audit(id, "profile_update", None).await;
        Ok(user)
    }

    pub async fn deactivate(&self, id: i64) -> Result<(), ServiceError> {
        if !User::deactivate(&self.pool, id).await? {
            return Err(ServiceError::NotFound { entity: "user", id });
        }

        self.audit(id, "deactivation", None).await;
        Ok(())
    }

    /// Apply a signed balance delta
    pub async fn adjust_balance(&self, id: i64, delta: &BigDecimal) -> Result<User, ServiceError> {
        let user = User::adjust_balance(&self.pool, id, delta)
            .await?
            .ok_or(ServiceError::NotFound { entity: "user", id })?;

        self.audit(id, "balance_update", Some(format!("Balance changed by {delta}")))
            .await;
        Ok(user)
    }

    pub async fn actions(&self, id: i64, limit: i64) -> Result<Vec<UserAction>, ServiceError> {
        Ok(UserAction::list_by_user(&self.pool, id, limit).await?)
    }

    async fn audit(&self, user_id: i64, action_type: &str, details: Option<String>) {
        if let Err(e) = UserAction::record(&self.pool, user_id, action_type, details).await {
            warn!(user_id, action_type, error = %e, "Failed to record user action");
        }
    }
}
