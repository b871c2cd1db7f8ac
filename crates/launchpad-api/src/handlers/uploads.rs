use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::CurrentSession;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{store_uploads, StoredUpload};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_files;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Top-level folder for the stored keys; defaults to `UPLOAD_DEFAULT_FOLDER`
    pub folder: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub files: Vec<StoredUpload>,
}

#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    params(UploadQuery),
    request_body(content = String, description = "Multipart body with one or more `file` fields", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "All files accepted and stored", body = UploadResponse),
        (status = 400, description = "No files or malformed body", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 413, description = "A file or the batch is too large", body = ErrorResponse),
        (status = 415, description = "A file is not an allowed image type", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, session, query, multipart),
    fields(user_id = %session.0.user.id, operation = "upload_files")
)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let folder = query
        .folder
        .unwrap_or_else(|| state.config.upload_default_folder().to_string());
    let files = extract_multipart_files(multipart).await?;

    let stored = store_uploads(
        state.storage.as_ref(),
        &folder,
        session.0.user.id,
        &files,
        Duration::from_secs(state.config.signed_url_ttl_secs()),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { files: stored })))
}
