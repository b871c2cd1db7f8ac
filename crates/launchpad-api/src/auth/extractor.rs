use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use launchpad_core::models::AuthSession;
use launchpad_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

/// The caller's session. Rejects with 401 when the request is anonymous.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AuthSession);

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match state.session_provider.get_session(&parts.headers).await? {
            Some(session) => Ok(CurrentSession(session)),
            None => Err(HttpAppError(AppError::Unauthorized(
                "Authentication required".to_string(),
            ))),
        }
    }
}

/// The caller's session if there is one; for pages that render for both.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<AuthSession>);

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session_provider.get_session(&parts.headers).await?;
        Ok(MaybeSession(session))
    }
}
