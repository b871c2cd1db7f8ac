use chrono::{DateTime, Utc};
use launchpad_core::{
    models::{Session, SessionMetadata},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for `sessions`
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, token, metadata), fields(db.table = "sessions", db.operation = "insert"))]
    pub async fn create(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
        metadata: &SessionMetadata,
    ) -> Result<Session, AppError> {
        let session = sqlx::query_as::<Postgres, Session>(
            r#"
            INSERT INTO sessions (user_id, token, expires_at, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token, expires_at, ip_address, user_agent, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .bind(metadata.ip_address.as_deref())
        .bind(metadata.user_agent.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Session for `token` unless it has expired
    #[tracing::instrument(skip(self, token), fields(db.table = "sessions", db.operation = "select"))]
    pub async fn find_valid_by_token(&self, token: &str) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<Postgres, Session>(
            r#"
            SELECT id, user_id, token, expires_at, ip_address, user_agent, created_at, updated_at
            FROM sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Returns whether a session was removed
    #[tracing::instrument(skip(self, token), fields(db.table = "sessions", db.operation = "delete"))]
    pub async fn delete_by_token(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "sessions", db.operation = "delete"))]
    pub async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
