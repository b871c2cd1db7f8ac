//! Launchpad web server
//!
//! Server-rendered pages, the JSON auth API and the uploads API on top of the
//! Launchpad storage, database and validator crates.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod utils;
pub mod views;

pub use state::AppState;
