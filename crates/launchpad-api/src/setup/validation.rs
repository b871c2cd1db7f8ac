//! Configuration validation
//!
//! Hard errors come from [`Config::validate`]; this adds the warnings that do
//! not stop start-up.

use anyhow::Result;
use launchpad_core::{Config, StorageBackend};

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.auth_base_url().starts_with("http://") {
            tracing::warn!(
                auth_base_url = %config.auth_base_url(),
                "AUTH_BASE_URL is not HTTPS in production; Secure session cookies are not sent over plain HTTP"
            );
        }
        if config.storage_backend() == Some(StorageBackend::Local) {
            tracing::warn!("Local filesystem storage is intended for development only");
        }
    }

    if config.session_cleanup_interval_secs() == 0 {
        tracing::warn!("SESSION_CLEANUP_INTERVAL_SECS is 0; expired sessions are never deleted");
    }

    Ok(())
}
