//! Launchpad Storage Library
//!
//! Object storage for validated uploads, with an S3-compatible backend and a local
//! filesystem backend for development.
//!
//! # Storage key format
//!
//! Uploads are stored under `{folder}/{entity_id}/{timestamp_ms}-{sanitized_filename}`.
//! Keys must not contain `..` or a leading `/`. Key generation lives in [`keys`] so
//! every backend and every caller agrees on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{sanitize_filename, upload_key, UploadKey};
pub use launchpad_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
