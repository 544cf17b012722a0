use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Audit row recording an account-level action (registration, login,
/// balance update, deactivation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserAction {
    pub id: i64,
    pub user_id: i64,
    pub action_type: String,
    pub status: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserAction {
    /// Record an action; audit failures are the caller's problem to swallow
    pub async fn record(
        pool: &PgPool,
        user_id: i64,
        action_type: &str,
        details: Option<String>,
    ) -> Result<UserAction, sqlx::Error> {
        sqlx::query_as::<_, UserAction>(
            r#"
            INSERT INTO user_actions (user_id, action_type, status, details, created_at)
            VALUES ($1, $2, 'success', $3, NOW())
            RETURNING id, user_id, action_type, status, details, created_at
            "#,
        )
        .bind(user_id)
        .bind(action_type)
        .bind(&details)
        .fetch_one(pool)
        .await
    }

    /// List a user's actions, newest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<UserAction>, sqlx::Error> {
        sqlx::query_as::<_, UserAction>(
            r#"
            SELECT id, user_id, action_type, status, details, created_at
            FROM user_actions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
