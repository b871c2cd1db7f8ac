//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services;
use crate::setup::routes::health;
use launchpad_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Launchpad API",
        version = "0.1.0",
        description = "Email/password authentication with cookie sessions, validated image uploads to S3-compatible storage, and signed file access."
    ),
    paths(
        // Auth
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::sign_out,
        handlers::auth::get_session,
        handlers::auth::verify_email,
        // Uploads
        handlers::uploads::upload_files,
        // Files
        handlers::files::get_file_url,
        handlers::files::delete_file,
        // Health
        health::health_check,
    ),
    components(schemas(
        error::ErrorResponse,
        models::User,
        models::Session,
        models::AuthSession,
        models::SignUpRequest,
        models::SignInRequest,
        handlers::auth::SuccessResponse,
        handlers::uploads::UploadResponse,
        handlers::files::SignedUrlResponse,
        services::StoredUpload,
        health::HealthCheckResponse,
    )),
    tags(
        (name = "auth", description = "Sign-up, sign-in and sessions"),
        (name = "uploads", description = "Validated image uploads"),
        (name = "files", description = "Access to stored uploads"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
