//! # Transaction Service
//!
//! Deposits and withdrawals against user balances. A movement is recorded
//! as a `pending` transaction, the balance is adjusted, and the transaction
//! is then marked completed.

use bigdecimal::BigDecimal;
use sqlx::PgPool;

use super::ServiceError;
use crate::models::{NewTransaction, Transaction, TransactionType, User};

#[derive(Clone)]
pub struct TransactionService {
    pool: PgPool,
}

impl TransactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn deposit(
        &self,
        user_id: i64,
        amount: BigDecimal,
        description: Option<String>,
    ) -> Result<Transaction, ServiceError> {
        if amount <= BigDecimal::from(0) {
            return Err(ServiceError::Validation("amount must be positive".into()));
        }

        let user = User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let transaction = Transaction::create(
            &self.pool,
            NewTransaction {
                user_id: user.id,
                amount: amount.clone(),
                transaction_type: TransactionType::Deposit,
                description: description.or_else(|| Some(format!("Deposit {amount}"))),
                related_transaction_id: None,
            },
        )
        .await?;

        User::adjust_balance(&self.pool, user_id, &amount).await?;

        self.finalize(transaction.id).await
    }

    pub async fn withdraw(
        &self,
        user_id: i64,
        amount: BigDecimal,
        description: Option<String>,
    ) -> Result<Transaction, ServiceError> {
        if amount <= BigDecimal::from(0) {
            return Err(ServiceError::Validation("amount must be positive".into()));
        }

        let user = User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        if user.balance < amount {
            return Err(ServiceError::InsufficientFunds);
        }

        // Withdrawals carry a negative amount on the ledger
        let transaction = Transaction::create(
            &self.pool,
            NewTransaction {
                user_id: user.id,
                amount: -amount.clone(),
                transaction_type: TransactionType::Withdrawal,
                description: description.or_else(|| Some(format!("Withdrawal {amount}"))),
                related_transaction_id: None,
            },
        )
        .await?;

        User::adjust_balance(&self.pool, user_id, &(-amount)).await?;

        self.finalize(transaction.id).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Transaction>, ServiceError> {
        Ok(Transaction::find_by_id(&self.pool, id).await?)
    }

    pub async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>, ServiceError> {
        Ok(Transaction::list_by_user(&self.pool, user_id, limit).await?)
    }

    async fn finalize(&self, transaction_id: i64) -> Result<Transaction, ServiceError> {
        Transaction::mark_completed(&self.pool, transaction_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "transaction",
                id: transaction_id,
            })
    }
}
