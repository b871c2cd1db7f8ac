//! Tracing initialization
//!
//! `RUST_LOG` drives the filter; without it the Launchpad crates log at debug and
//! HTTP spans from tower-http are included.

mod init_basic;

pub use init_basic::{init_telemetry, LogFormat, DEFAULT_FILTER};
