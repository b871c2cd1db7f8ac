//! Upload validation for user-submitted images.
//!
//! The accept decision is made from the leading bytes of the content only. Declared
//! filenames and client MIME types are carried along for messages and storage keys
//! but never influence which [`ImageKind`] a file is detected as.

pub mod error;
pub mod kind;
pub mod source;
pub mod validator;

pub use error::UploadRejection;
pub use kind::{detect_kind, ImageKind};
pub use source::{FileUpload, MemoryUpload, UploadSource};
pub use validator::{
    validate_batch, validate_batch_with, validate_one, validate_size, validate_total_size,
    BatchPolicy, BatchReport, ValidatedUpload, MAX_FILE_SIZE, MAX_TOTAL_SIZE,
};
