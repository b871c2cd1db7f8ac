//! Request-independent logic shared by the page and JSON handlers

pub mod auth;
pub mod cleanup;
pub mod uploads;

pub use auth::{AuthService, IssuedSession};
pub use cleanup::spawn_expired_auth_cleanup;
pub use uploads::{store_uploads, StoredUpload, UploadError};
