//! Route configuration and setup.

pub mod health;

use crate::api_doc::ApiDoc;
use crate::handlers::{auth, files, pages, uploads};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use launchpad_core::{Config, StorageBackend};
use launchpad_infra::{request_id_middleware, security_headers_middleware, SecurityHeadersConfig};
use launchpad_upload::MAX_TOTAL_SIZE;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Multipart framing overhead allowed on top of the batch limit
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let security_headers_config = SecurityHeadersConfig::for_environment(config.is_production());

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(http_concurrency_limit, "HTTP concurrency limit layer enabled");

    let body_limit = usize::try_from(MAX_TOTAL_SIZE + MULTIPART_OVERHEAD_BYTES).unwrap_or(usize::MAX);

    let mut routes = page_routes().merge(api_routes());
    if let Some(mount) = local_media_mount(config) {
        tracing::info!(mount = %mount, "Serving local storage");
        routes = routes.route(&format!("{}/{{*key}}", mount), get(files::serve_local_file));
    }

    let app = routes
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|origin| origin == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", origin, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route(
            "/register",
            get(pages::register_page).post(pages::register_submit),
        )
        .route("/logout", post(pages::logout))
        .route("/upload", post(pages::upload_submit))
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/api/auth/sign-up/email", post(auth::sign_up))
        .route("/api/auth/sign-in/email", post(auth::sign_in))
        .route("/api/auth/sign-out", post(auth::sign_out))
        .route("/api/auth/get-session", get(auth::get_session))
        .route("/api/auth/verify-email", get(auth::verify_email))
        .route("/api/uploads", post(uploads::upload_files))
        .route(
            "/api/files/{*key}",
            get(files::get_file_url).delete(files::delete_file),
        )
}

/// Path under which local storage objects are served, taken from the path of
/// `LOCAL_STORAGE_BASE_URL`. `None` for other backends or a root path.
fn local_media_mount(config: &Config) -> Option<String> {
    if config.storage_backend() != Some(StorageBackend::Local) {
        return None;
    }
    let base_url = config.local_storage_base_url()?;
    let without_scheme = base_url.split_once("://").map_or(base_url, |(_, rest)| rest);
    let path = without_scheme.find('/').map(|idx| &without_scheme[idx..])?;
    let path = path.trim_end_matches('/');
    if path.is_empty() || path.starts_with("/api") {
        return None;
    }
    Some(path.to_string())
}
