use std::sync::Arc;

use launchpad_core::Config;
use launchpad_db::{AccountRepository, SessionRepository, UserRepository, VerificationRepository};
use launchpad_storage::Storage;
use sqlx::PgPool;

use crate::auth::SessionProvider;
use crate::services::AuthService;
use crate::views::Views;

/// Database handles shared by every request
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub users: UserRepository,
    pub accounts: AccountRepository,
    pub sessions: SessionRepository,
    pub verifications: VerificationRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            verifications: VerificationRepository::new(pool.clone()),
            pool,
        }
    }
}

pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub storage: Arc<dyn Storage>,
    /// Resolves the caller's session from request headers
    pub session_provider: Arc<dyn SessionProvider>,
    pub auth: AuthService,
    pub views: Views,
}
