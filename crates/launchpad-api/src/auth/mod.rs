//! Email and password authentication with server-side sessions

pub mod cookie;
pub mod extractor;
pub mod password;
pub mod provider;

pub use extractor::{CurrentSession, MaybeSession};
pub use provider::{DbSessionProvider, SessionProvider};
