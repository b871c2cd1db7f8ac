//! JSON authentication API under `/api/auth`

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use launchpad_core::models::{AuthSession, SignInRequest, SignUpRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::cookie::session_token_from_headers;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::client::session_metadata;

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyEmailQuery {
    /// Token issued at sign-up
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-up/email",
    tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created and signed in", body = AuthSession),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let issued = state
        .auth
        .sign_up(request, session_metadata(&headers))
        .await?;

    Ok(([(header::SET_COOKIE, issued.cookie)], Json(issued.auth)))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-in/email",
    tag = "auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthSession),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let issued = state
        .auth
        .sign_in(request, session_metadata(&headers))
        .await?;

    Ok(([(header::SET_COOKIE, issued.cookie)], Json(issued.auth)))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    tag = "auth",
    responses(
        (status = 200, description = "Session ended and cookie cleared", body = SuccessResponse)
    )
)]
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpAppError> {
    let token = session_token_from_headers(&headers, state.auth.secret());
    state.auth.sign_out(token).await?;

    Ok((
        [(header::SET_COOKIE, state.auth.clear_cookie())],
        Json(SuccessResponse { success: true }),
    ))
}

/// The current session, or `null` when signed out.
#[utoipa::path(
    get,
    path = "/api/auth/get-session",
    tag = "auth",
    responses(
        (status = 200, description = "Current session or null", body = Option<AuthSession>)
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Option<AuthSession>>, HttpAppError> {
    let session = state.session_provider.get_session(&headers).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/auth/verify-email",
    tag = "auth",
    params(VerifyEmailQuery),
    responses(
        (status = 200, description = "Email verified", body = SuccessResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.auth.verify_email(&query.token).await?;
    Ok((StatusCode::OK, Json(SuccessResponse { success: true })))
}
