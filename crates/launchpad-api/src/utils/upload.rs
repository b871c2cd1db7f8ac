//! Multipart extraction for upload handlers

use axum::extract::Multipart;
use axum::http::StatusCode;
use launchpad_core::AppError;
use launchpad_upload::{MemoryUpload, MAX_TOTAL_SIZE};

/// Name of the multipart field that carries files
pub const FILE_FIELD: &str = "file";

/// Collect every `file` field of a multipart body.
///
/// Other fields are ignored. A `file` part without a filename and without
/// content is what browsers send for an empty file input, so it is skipped.
/// Returns `BadRequest` when no file remains.
pub async fn extract_multipart_files(mut multipart: Multipart) -> Result<Vec<MemoryUpload>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        if filename.is_empty() && data.is_empty() {
            continue;
        }

        let upload = MemoryUpload::new(filename, data);
        files.push(match content_type {
            Some(content_type) => upload.with_content_type(content_type),
            None => upload,
        });
    }

    if files.is_empty() {
        return Err(AppError::BadRequest(format!(
            "No files provided; send one or more multipart fields named '{}'",
            FILE_FIELD
        )));
    }

    Ok(files)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Request body exceeds the {} MB upload limit",
            MAX_TOTAL_SIZE / 1024 / 1024
        ))
    } else {
        AppError::BadRequest(format!("Failed to read multipart body: {}", err.body_text()))
    }
}
