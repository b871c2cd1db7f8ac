//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into [`AppError`] renders as the same JSON [`ErrorResponse`] shape.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use launchpad_core::{AppError, ErrorMetadata, LogLevel};
use launchpad_storage::StorageError;
use launchpad_upload::UploadRejection;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether retrying the same request can succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(error: &AppError, include_details: bool) -> Self {
        Self {
            error: error.client_message(),
            details: include_details.then(|| error.detailed_message()),
            error_type: include_details.then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper so `IntoResponse` (axum) can be implemented for `AppError` (launchpad-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<validator::ValidationErrors> for HttpAppError {
    fn from(err: validator::ValidationErrors) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// JSON body deserialization failures become a 400 in our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            StorageError::UploadFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

/// Upload rejections keep their message verbatim; the variant picks the status.
impl From<UploadRejection> for HttpAppError {
    fn from(rejection: UploadRejection) -> Self {
        let message = rejection.to_string();
        let app = if rejection.is_size_related() {
            AppError::PayloadTooLarge(message)
        } else if matches!(rejection, UploadRejection::UnrecognizedContent { .. }) {
            AppError::UnsupportedMediaType(message)
        } else {
            AppError::BadRequest(message)
        };
        HttpAppError(app)
    }
}

/// `Json<T>` that rejects with our ErrorResponse format instead of axum's plain text.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

pub(crate) fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type, code, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| {
            let env = env.to_lowercase();
            env == "production" || env == "prod"
        })
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the server in production or for sensitive errors.
        let include_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, include_details);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_rejections_map_to_413_with_verbatim_message() {
        let rejection = UploadRejection::SizeExceeded {
            filename: "huge.png".to_string(),
            size: 6 * 1024 * 1024,
            max: 5 * 1024 * 1024,
        };
        let message = rejection.to_string();
        let HttpAppError(app) = HttpAppError::from(rejection);
        assert_eq!(app.http_status_code(), 413);
        assert_eq!(app.client_message(), message);

        let HttpAppError(app) = HttpAppError::from(UploadRejection::TotalSizeExceeded {
            total: 21 * 1024 * 1024,
            max: 20 * 1024 * 1024,
        });
        assert_eq!(app.http_status_code(), 413);
    }

    #[test]
    fn test_unrecognized_content_maps_to_415() {
        let rejection = UploadRejection::UnrecognizedContent {
            filename: "notes.txt".to_string(),
        };
        let message = rejection.to_string();
        let HttpAppError(app) = HttpAppError::from(rejection);
        assert_eq!(app.http_status_code(), 415);
        assert_eq!(app.client_message(), message);
        assert!(message.contains("notes.txt"));
    }

    #[test]
    fn test_unreadable_upload_maps_to_400() {
        let rejection = UploadRejection::Unreadable {
            filename: "cat.png".to_string(),
            reason: "connection reset".to_string(),
        };
        assert!(!rejection.is_size_related());
        let HttpAppError(app) = HttpAppError::from(rejection);
        assert_eq!(app.http_status_code(), 400);
        assert!(app.client_message().contains("cat.png"));
    }

    #[test]
    fn test_storage_errors_are_mapped() {
        let HttpAppError(app) = HttpAppError::from(StorageError::NotFound("a/b/c".to_string()));
        assert_eq!(app.http_status_code(), 404);

        let HttpAppError(app) =
            HttpAppError::from(StorageError::UploadFailed("connection reset".to_string()));
        assert_eq!(app.http_status_code(), 500);
        assert!(app.is_sensitive());
        assert_eq!(app.client_message(), "Failed to access storage");
    }

    #[test]
    fn test_sensitive_errors_hide_details() {
        let err = AppError::Internal("secret detail".to_string());
        let body = ErrorResponse::from_app_error(&err, false);
        assert_eq!(body.error, "Internal server error");
        assert!(body.details.is_none());

        let err = AppError::NotFound("File not found".to_string());
        let body = ErrorResponse::from_app_error(&err, true);
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.error_type.as_deref(), Some("NotFound"));
    }
}
