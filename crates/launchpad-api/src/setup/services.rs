//! Wiring of repositories, storage and auth into [`AppState`]

use crate::auth::DbSessionProvider;
use crate::services::{spawn_expired_auth_cleanup, AuthService};
use crate::state::{AppState, DbState};
use crate::views::Views;
use launchpad_core::Config;
use launchpad_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(
    config: Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> anyhow::Result<Arc<AppState>> {
    let db = DbState::new(pool);

    let session_provider = Arc::new(DbSessionProvider::new(
        db.sessions.clone(),
        db.users.clone(),
        config.auth_secret(),
    ));

    let auth = AuthService::new(
        &config,
        db.users.clone(),
        db.accounts.clone(),
        db.sessions.clone(),
        db.verifications.clone(),
    );

    let views = Views::new()?;

    Ok(Arc::new(AppState {
        config,
        db,
        storage,
        session_provider,
        auth,
        views,
    }))
}

/// Spawn the periodic jobs that run for the lifetime of the server
pub fn start_background_tasks(state: &AppState) {
    // Detached; the task stops with the runtime.
    let _ = spawn_expired_auth_cleanup(
        state.db.sessions.clone(),
        state.db.verifications.clone(),
        state.config.session_cleanup_interval_secs(),
    );
}
