use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::Utc;
use launchpad_core::models::AuthSession;
use launchpad_core::AppError;
use launchpad_db::{SessionRepository, UserRepository};

use super::cookie::session_token_from_headers;

/// Resolves the signed-in user for a request.
///
/// `Ok(None)` means the caller is anonymous: no cookie, a bad signature, an
/// unknown or expired session. Errors are reserved for backend failures.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<AuthSession>, AppError>;
}

/// Session provider backed by the `sessions` and `users` tables
pub struct DbSessionProvider {
    sessions: SessionRepository,
    users: UserRepository,
    secret: String,
}

impl DbSessionProvider {
    pub fn new(sessions: SessionRepository, users: UserRepository, secret: impl Into<String>) -> Self {
        Self {
            sessions,
            users,
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for DbSessionProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<AuthSession>, AppError> {
        let Some(token) = session_token_from_headers(headers, &self.secret) else {
            return Ok(None);
        };

        let Some(session) = self.sessions.find_valid_by_token(token).await? else {
            tracing::debug!("Session cookie did not match a live session");
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            return Ok(None);
        }

        let Some(user) = self.users.find_by_id(session.user_id).await? else {
            tracing::warn!(session_id = %session.id, "Session references a missing user");
            return Ok(None);
        };

        Ok(Some(AuthSession { user, session }))
    }
}
