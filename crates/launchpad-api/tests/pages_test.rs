mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use common::{png_bytes, session_cookie_for, TestApp};
use serde_json::Value;

#[tokio::test]
async fn anonymous_home_links_to_login_and_register() {
    let app = TestApp::new().await;

    let response = app.server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(r#"href="/login""#));
    assert!(html.contains(r#"href="/register""#));
    assert!(!html.contains("multipart/form-data"));
}

#[tokio::test]
async fn signed_in_home_shows_the_upload_form() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/")
        .add_header("Cookie", session_cookie_for(&app.alice))
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Hello, Alice"));
    assert!(html.contains(r#"action="/upload""#));
    assert!(html.contains(r#"action="/logout""#));
}

#[tokio::test]
async fn login_and_register_pages_render_for_anonymous_users() {
    let app = TestApp::new().await;

    let login = app.server.get("/login").await;
    login.assert_status_ok();
    assert!(login.text().contains(r#"action="/login""#));

    let register = app.server.get("/register").await;
    register.assert_status_ok();
    assert!(register.text().contains(r#"name="password""#));
}

#[tokio::test]
async fn auth_pages_redirect_signed_in_users_home() {
    let app = TestApp::new().await;

    for path in ["/login", "/register"] {
        let response = app
            .server
            .get(path)
            .add_header("Cookie", session_cookie_for(&app.alice))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/");
    }
}

#[tokio::test]
async fn upload_form_renders_rejections_verbatim() {
    let app = TestApp::new().await;
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(Bytes::from_static(b"plain text")).file_name("notes.txt"),
    );

    let response = app
        .server
        .post("/upload")
        .add_header("Cookie", session_cookie_for(&app.alice))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let html = response.text();
    assert!(html.contains("File &quot;notes.txt&quot; is not an allowed image type"));
}

#[tokio::test]
async fn upload_form_lists_stored_files() {
    let app = TestApp::new().await;
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(Bytes::from(png_bytes(64))).file_name("holiday.png"),
    );

    let response = app
        .server
        .post("/upload")
        .add_header("Cookie", session_cookie_for(&app.alice))
        .multipart(form)
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Uploaded:"));
    assert!(html.contains("-holiday.png"));
}

#[tokio::test]
async fn upload_form_sends_anonymous_users_to_login() {
    let app = TestApp::new().await;
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(Bytes::from(png_bytes(64))).file_name("holiday.png"),
    );

    let response = app.server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn get_session_is_null_when_signed_out() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/auth/get-session").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body.is_null());
}

#[tokio::test]
async fn get_session_returns_user_without_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/api/auth/get-session")
        .add_header("Cookie", session_cookie_for(&app.alice))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["session"].get("token").is_none());
}

#[tokio::test]
async fn responses_carry_security_headers_and_request_id() {
    let app = TestApp::new().await;

    let response = app.server.get("/").await;

    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
    assert!(response.maybe_header("content-security-policy").is_some());
    assert!(response.maybe_header("x-request-id").is_some());
    // Development config: no HSTS
    assert!(response.maybe_header("strict-transport-security").is_none());
}

#[tokio::test]
async fn invalid_json_body_uses_the_error_format() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/sign-in/email")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{\"email\": 42}"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn health_reports_an_unreachable_database() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["storage"], "healthy");
    assert_ne!(body["database"], "healthy");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["info"]["title"], "Launchpad API");
    assert!(body["paths"].get("/api/uploads").is_some());
}
