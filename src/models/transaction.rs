use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Refund,
}

/// A balance movement on a user account. Withdrawals carry a negative amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: BigDecimal,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub status: String,
    pub related_transaction_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: i64,
    pub amount: BigDecimal,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub related_transaction_id: Option<i64>,
}

impl Transaction {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    /// Create a new transaction in `pending` status
    pub async fn create(
        pool: &PgPool,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, amount, transaction_type, description,
                                      status, related_transaction_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'pending', $5, NOW(), NOW())
            RETURNING id, user_id, amount, transaction_type, description, status,
                      related_transaction_id, created_at, updated_at
            "#,
        )
        .bind(new_transaction.user_id)
        .bind(&new_transaction.amount)
        .bind(new_transaction.transaction_type)
        .bind(&new_transaction.description)
        .bind(new_transaction.related_transaction_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, transaction_type, description, status,
                   related_transaction_id, created_at, updated_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Mark a transaction as completed
    pub async fn mark_completed(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, amount, transaction_type, description, status,
                      related_transaction_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List a user's transactions, newest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, transaction_type, description, status,
                   related_transaction_id, created_at, updated_at
            FROM transactions
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
