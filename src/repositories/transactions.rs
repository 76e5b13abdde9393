use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::transactions::{Transaction, TransactionKind, TransactionStatus};

#[derive(Clone)]
pub struct TransactionRepository {
    conn: PgPool,
}

impl TransactionRepository {
    pub fn new(conn: PgPool) -> Self {
        TransactionRepository { conn }
    }

    /// Requests always enter the queue as PENDING; the status column is not
    /// caller-supplied.
    pub async fn insert_request(
        &self,
        user_id: &str,
        kind: TransactionKind,
        amount_in_cents: i64,
        details: &str,
        operator: Option<&str>,
    ) -> Result<Transaction, RepositoryError> {
        let transaction_id = Uuid::new_v4().hyphenated().to_string();

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (id, user_id, kind, amount_in_cents, details, operator, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(&transaction_id)
        .bind(user_id)
        .bind(kind)
        .bind(amount_in_cents)
        .bind(details)
        .bind(operator)
        .fetch_one(&self.conn)
        .await?;

        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>, RepositoryError> {
        let transaction =
            sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.conn)
                .await?;

        Ok(transaction)
    }

    pub async fn list_all(&self) -> Result<Vec<Transaction>, RepositoryError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions ORDER BY created_at DESC",
        )
        .fetch_all(&self.conn)
        .await?;

        Ok(transactions)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Transaction>, RepositoryError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(transactions)
    }

    /// Moves a pending request to a terminal status and applies its balance
    /// effect in one database transaction. The conditional UPDATE is the
    /// idempotency guard: a request already out of PENDING settles zero rows
    /// and the whole call fails without touching any balance, so a duplicate
    /// approve click or a concurrent admin can never double-apply the delta.
    pub async fn settle(
        &self,
        id: &str,
        decision: TransactionStatus,
    ) -> Result<Transaction, RepositoryError> {
        let mut tx = self.conn.begin().await?;

        let settled = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(decision)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let settled = match settled {
            Some(transaction) => transaction,
            None => {
                let exists =
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM transactions WHERE id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;

                return Err(if exists > 0 {
                    RepositoryError::AlreadySettled
                } else {
                    RepositoryError::NotFound
                });
            }
        };

        if decision == TransactionStatus::Success {
            let delta = settled.kind.settlement_delta(settled.amount_in_cents);
            let updated = sqlx::query(
                r#"
                UPDATE users
                SET balance_in_cents = balance_in_cents + $1, updated_at = CURRENT_TIMESTAMP
                WHERE id = $2
                "#,
            )
            .bind(delta)
            .bind(&settled.user_id)
            .execute(&mut *tx)
            .await?;

            // Owning account gone: roll back so the request stays PENDING.
            if updated.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }

        tx.commit().await?;

        Ok(settled)
    }
}
