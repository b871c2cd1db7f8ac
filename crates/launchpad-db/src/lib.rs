//! Launchpad database access
//!
//! sqlx repositories over the authentication schema in the workspace
//! `migrations/` directory.

pub mod db;

pub use db::{
    AccountRepository, SessionRepository, UserRepository, VerificationRepository,
};
