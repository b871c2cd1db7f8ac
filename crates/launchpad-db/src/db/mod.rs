//! Database repositories for data access layer
//!
//! One repository per table. Every query is instrumented with the table and the
//! operation so slow statements show up in traces.

mod account;
mod session;
mod user;
mod verification;

pub use account::AccountRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
pub use verification::VerificationRepository;

