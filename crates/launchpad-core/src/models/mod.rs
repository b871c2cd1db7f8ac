//! Data models for the application
//!
//! Rows of the authentication schema plus the request/response shapes the auth
//! API exposes.

mod account;
mod session;
mod user;
mod verification;

pub use account::*;
pub use session::*;
pub use user::*;
pub use verification::*;
