//! Signed access to and deletion of stored uploads.
//!
//! Keys are `{folder}/{user_id}/{file}`; a caller may only touch keys issued
//! for their own user id.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use launchpad_core::AppError;
use launchpad_storage::UploadKey;
use launchpad_upload::detect_kind;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentSession;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SignedUrlResponse {
    pub url: String,
    /// Seconds until `url` stops working
    pub expires_in: u64,
}

fn authorize_key(key: &str, user_id: Uuid) -> Result<(), AppError> {
    let parsed =
        UploadKey::parse(key).ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
    if !parsed.belongs_to(user_id) {
        return Err(AppError::Forbidden(
            "You do not have access to this file".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/files/{key}",
    tag = "files",
    params(("key" = String, Path, description = "Storage key returned by the upload endpoint")),
    responses(
        (status = 200, description = "Signed URL", body = SignedUrlResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Key belongs to another user", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, session), fields(user_id = %session.0.user.id))]
pub async fn get_file_url(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Path(key): Path<String>,
) -> Result<Json<SignedUrlResponse>, HttpAppError> {
    authorize_key(&key, session.0.user.id)?;

    if !state.storage.exists(&key).await? {
        return Err(AppError::NotFound("File not found".to_string()).into());
    }

    let expires_in = state.config.signed_url_ttl_secs();
    let url = state
        .storage
        .signed_url(&key, Duration::from_secs(expires_in))
        .await?;

    Ok(Json(SignedUrlResponse { url, expires_in }))
}

#[utoipa::path(
    delete,
    path = "/api/files/{key}",
    tag = "files",
    params(("key" = String, Path, description = "Storage key returned by the upload endpoint")),
    responses(
        (status = 204, description = "File deleted"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Key belongs to another user", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, session), fields(user_id = %session.0.user.id))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Path(key): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    authorize_key(&key, session.0.user.id)?;

    state.storage.delete(&key).await?;
    tracing::info!(key = %key, "File deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Serve an object from local filesystem storage at its public URL.
///
/// Only mounted for the local backend, where `signed_url` is the public URL.
pub async fn serve_local_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let data = state.storage.get(&key).await?;
    let content_type = detect_kind(&data)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");

    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
