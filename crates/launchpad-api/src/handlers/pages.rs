//! Server-rendered pages: home, login, register, logout and the upload form.
//!
//! Form failures re-render the form with the error message instead of
//! returning JSON.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use launchpad_core::models::{SignInRequest, SignUpRequest};
use launchpad_core::{AppError, ErrorMetadata};

use crate::auth::cookie::session_token_from_headers;
use crate::auth::MaybeSession;
use crate::error::{log_error, HttpAppError};
use crate::services::store_uploads;
use crate::state::AppState;
use crate::utils::client::session_metadata;
use crate::utils::upload::extract_multipart_files;
use crate::views::UploadNotice;

/// Status and message a form page shows for a failed submission
fn form_failure(err: &AppError) -> (StatusCode, String) {
    log_error(err);
    let status = match err {
        AppError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        other => StatusCode::from_u16(other.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    };
    (status, err.client_message())
}

/// Send a rendered page, or the JSON error when rendering failed.
fn page(status: StatusCode, html: Result<String, AppError>) -> Response {
    match html {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => HttpAppError(err).into_response(),
    }
}

fn with_session_cookie(cookie: String, to: &str) -> Response {
    ([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> Response {
    page(StatusCode::OK, state.views.home_page(session.as_ref(), None))
}

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> Response {
    if session.is_some() {
        return Redirect::to("/").into_response();
    }
    page(StatusCode::OK, state.views.login_page(None, ""))
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(request): Form<SignInRequest>,
) -> Response {
    let email = request.email.clone();
    match state.auth.sign_in(request, session_metadata(&headers)).await {
        Ok(issued) => with_session_cookie(issued.cookie, "/"),
        Err(err) => {
            let (status, message) = form_failure(&err);
            page(status, state.views.login_page(Some(&message), &email))
        }
    }
}

pub async fn register_page(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> Response {
    if session.is_some() {
        return Redirect::to("/").into_response();
    }
    page(StatusCode::OK, state.views.register_page(None, "", ""))
}

pub async fn register_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(request): Form<SignUpRequest>,
) -> Response {
    let (name, email) = (request.name.clone(), request.email.clone());
    match state.auth.sign_up(request, session_metadata(&headers)).await {
        Ok(issued) => with_session_cookie(issued.cookie, "/"),
        Err(err) => {
            let (status, message) = form_failure(&err);
            page(
                status,
                state.views.register_page(Some(&message), &name, &email),
            )
        }
    }
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let token = session_token_from_headers(&headers, state.auth.secret());
    state.auth.sign_out(token).await?;
    Ok(with_session_cookie(state.auth.clear_cookie(), "/login"))
}

/// Upload form target. Stores into the default folder and renders the
/// outcome on the home page; rejection messages are shown verbatim.
pub async fn upload_submit(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    multipart: Multipart,
) -> Response {
    let Some(session) = session else {
        return Redirect::to("/login").into_response();
    };

    let result = async {
        let files = extract_multipart_files(multipart).await.map_err(HttpAppError)?;
        let stored = store_uploads(
            state.storage.as_ref(),
            state.config.upload_default_folder(),
            session.user.id,
            &files,
            Duration::from_secs(state.config.signed_url_ttl_secs()),
        )
        .await?;
        Ok::<_, HttpAppError>(stored)
    }
    .await;

    let (status, notice) = match result {
        Ok(stored) => (StatusCode::OK, UploadNotice::Stored(stored)),
        Err(HttpAppError(err)) => {
            let (status, message) = form_failure(&err);
            (status, UploadNotice::Failed(message))
        }
    };

    page(status, state.views.home_page(Some(&session), Some(&notice)))
}
