use launchpad_core::{
    models::{Account, CREDENTIAL_PROVIDER},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for `accounts`
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The email/password account of a user, if any
    #[tracing::instrument(skip(self), fields(db.table = "accounts", db.operation = "select"))]
    pub async fn find_credential(&self, user_id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<Postgres, Account>(
            r#"
            SELECT id, user_id, account_id, provider_id, password, access_token, refresh_token,
                   id_token, access_token_expires_at, refresh_token_expires_at, scope,
                   created_at, updated_at
            FROM accounts
            WHERE user_id = $1 AND provider_id = $2
            "#,
        )
        .bind(user_id)
        .bind(CREDENTIAL_PROVIDER)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
