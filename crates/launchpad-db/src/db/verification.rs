use chrono::{DateTime, Utc};
use launchpad_core::{models::Verification, AppError};
use sqlx::{PgPool, Postgres};

/// Repository for `verifications`
#[derive(Clone)]
pub struct VerificationRepository {
    pool: PgPool,
}

impl VerificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, value), fields(db.table = "verifications", db.operation = "insert"))]
    pub async fn create(
        &self,
        identifier: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Verification, AppError> {
        let verification = sqlx::query_as::<Postgres, Verification>(
            r#"
            INSERT INTO verifications (identifier, value, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, identifier, value, expires_at, created_at, updated_at
            "#,
        )
        .bind(identifier)
        .bind(value)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(verification)
    }

    /// Consume a verification value.
    ///
    /// The row is deleted in the same statement that reads it, so a value can be
    /// used once. Expired values are left for [`Self::delete_expired`] and yield `None`.
    #[tracing::instrument(skip(self, value), fields(db.table = "verifications", db.operation = "delete"))]
    pub async fn take_valid(&self, value: &str) -> Result<Option<Verification>, AppError> {
        let verification = sqlx::query_as::<Postgres, Verification>(
            r#"
            DELETE FROM verifications
            WHERE value = $1 AND expires_at > NOW()
            RETURNING id, identifier, value, expires_at, created_at, updated_at
            "#,
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(verification)
    }

    #[tracing::instrument(skip(self), fields(db.table = "verifications", db.operation = "delete"))]
    pub async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM verifications WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
