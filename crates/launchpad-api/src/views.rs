//! Server-rendered pages.
//!
//! Templates live in `templates/` and are compiled into the binary. Handlebars
//! escapes every `{{value}}`, so user-supplied text is never written raw.

use handlebars::Handlebars;
use launchpad_core::models::AuthSession;
use launchpad_core::AppError;
use launchpad_upload::{ImageKind, MAX_FILE_SIZE, MAX_TOTAL_SIZE};
use serde::Serialize;

use crate::services::StoredUpload;

const LAYOUT: &str = include_str!("../templates/layout.hbs");

const PAGES: [(&str, &str); 3] = [
    ("home", include_str!("../templates/home.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("register", include_str!("../templates/register.hbs")),
];

/// Outcome of the last upload, shown on the home page
pub enum UploadNotice {
    Stored(Vec<StoredUpload>),
    Failed(String),
}

#[derive(Serialize)]
struct UserView<'a> {
    name: &'a str,
    email: &'a str,
    email_verified: bool,
}

impl<'a> From<&'a AuthSession> for UserView<'a> {
    fn from(auth: &'a AuthSession) -> Self {
        Self {
            name: &auth.user.name,
            email: &auth.user.email,
            email_verified: auth.user.email_verified,
        }
    }
}

#[derive(Serialize)]
struct UploadLimits {
    accept: String,
    allowed: String,
    file_mb: u64,
    total_mb: u64,
}

impl UploadLimits {
    fn current() -> Self {
        Self {
            accept: ImageKind::ALL.map(ImageKind::mime_type).join(","),
            allowed: ImageKind::allowed_list(),
            file_mb: MAX_FILE_SIZE / 1024 / 1024,
            total_mb: MAX_TOTAL_SIZE / 1024 / 1024,
        }
    }
}

#[derive(Serialize)]
struct HomeContext<'a> {
    title: &'static str,
    user: Option<UserView<'a>>,
    error: Option<&'a str>,
    stored: Option<&'a [StoredUpload]>,
    limits: UploadLimits,
}

#[derive(Serialize)]
struct FormContext<'a> {
    title: &'static str,
    error: Option<&'a str>,
    name: &'a str,
    email: &'a str,
}

/// Compiled page templates
#[derive(Clone)]
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> anyhow::Result<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_partial("layout", LAYOUT)
            .map_err(|e| anyhow::anyhow!("Invalid layout template: {}", e))?;
        for (name, source) in PAGES {
            registry
                .register_template_string(name, source)
                .map_err(|e| anyhow::anyhow!("Invalid {} template: {}", name, e))?;
        }
        Ok(Self { registry })
    }

    fn render(&self, name: &str, context: &impl Serialize) -> Result<String, AppError> {
        self.registry
            .render(name, context)
            .map_err(|e| AppError::Internal(format!("Failed to render {} page: {}", name, e)))
    }

    pub fn home_page(
        &self,
        session: Option<&AuthSession>,
        notice: Option<&UploadNotice>,
    ) -> Result<String, AppError> {
        let (error, stored) = match notice {
            Some(UploadNotice::Failed(message)) => (Some(message.as_str()), None),
            Some(UploadNotice::Stored(files)) => (None, Some(files.as_slice())),
            None => (None, None),
        };

        self.render(
            "home",
            &HomeContext {
                title: "Home",
                user: session.map(UserView::from),
                error,
                stored,
                limits: UploadLimits::current(),
            },
        )
    }

    pub fn login_page(&self, error: Option<&str>, email: &str) -> Result<String, AppError> {
        self.render(
            "login",
            &FormContext {
                title: "Sign in",
                error,
                name: "",
                email,
            },
        )
    }

    pub fn register_page(
        &self,
        error: Option<&str>,
        name: &str,
        email: &str,
    ) -> Result<String, AppError> {
        self.render(
            "register",
            &FormContext {
                title: "Create account",
                error,
                name,
                email,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use launchpad_core::models::{Session, User};
    use uuid::Uuid;

    fn session(name: &str) -> AuthSession {
        let now = Utc::now();
        let user_id = Uuid::new_v4();
        AuthSession {
            user: User {
                id: user_id,
                name: name.to_string(),
                email: "ada@example.com".to_string(),
                email_verified: false,
                image: None,
                created_at: now,
                updated_at: now,
            },
            session: Session {
                id: Uuid::new_v4(),
                user_id,
                token: "token".to_string(),
                expires_at: now + Duration::hours(1),
                ip_address: None,
                user_agent: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_login_page_escapes_values() {
        let views = Views::new().unwrap();
        let html = views
            .login_page(Some("<b>bad</b>"), "a\"@example.com")
            .unwrap();
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains("a&quot;@example.com"));
        assert!(!html.contains("<b>bad</b>"));
    }

    #[test]
    fn test_anonymous_home_links_to_auth_pages() {
        let html = Views::new().unwrap().home_page(None, None).unwrap();
        assert!(html.contains(r#"href="/login""#));
        assert!(html.contains(r#"href="/register""#));
        assert!(!html.contains("multipart/form-data"));
        assert!(html.contains("<title>Home · Launchpad</title>"));
    }

    #[test]
    fn test_signed_in_home_shows_upload_form() {
        let auth = session("<Ada>");
        let html = Views::new().unwrap().home_page(Some(&auth), None).unwrap();
        assert!(html.contains("Hello, &lt;Ada&gt;"));
        assert!(html.contains(r#"action="/upload""#));
        assert!(html.contains(r#"action="/logout""#));
        assert!(html.contains("image/png,image/jpeg,image/gif,image/webp"));
        assert!(html.contains("Up to 5 MB per file, 20 MB per upload."));
        assert!(html.contains("Your email is not verified yet."));
    }

    #[test]
    fn test_home_lists_stored_files() {
        let auth = session("Ada");
        let notice = UploadNotice::Stored(vec![StoredUpload {
            key: "uploads/1/2-cat.png".to_string(),
            kind: ImageKind::Png,
            size: 12,
            url: "http://localhost:3000/media/uploads/1/2-cat.png".to_string(),
        }]);
        let html = Views::new()
            .unwrap()
            .home_page(Some(&auth), Some(&notice))
            .unwrap();
        assert!(html.contains("Uploaded:"));
        assert!(html.contains(">uploads/1/2-cat.png</a> (png, 12 bytes)"));
    }

    #[test]
    fn test_register_page_keeps_entered_values() {
        let html = Views::new()
            .unwrap()
            .register_page(Some("Email taken"), "Ada", "ada@example.com")
            .unwrap();
        assert!(html.contains(r#"value="Ada""#));
        assert!(html.contains(r#"value="ada@example.com""#));
        assert!(html.contains("Email taken"));
    }
}
