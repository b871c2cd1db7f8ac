use bytes::Bytes;
use serde::Serialize;

use crate::error::UploadRejection;
use crate::kind::{detect_kind, ImageKind};
use crate::source::UploadSource;

/// Per-file cap: 5 MiB
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Cap on the summed declared size of one batch: 20 MiB
pub const MAX_TOTAL_SIZE: u64 = 20 * 1024 * 1024;

/// An upload whose content matched an allowed signature.
///
/// Keeps the bytes that were inspected so the caller can store exactly what was
/// validated without reading the source again.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedUpload {
    pub name: String,
    pub size: u64,
    pub kind: ImageKind,
    #[serde(skip)]
    pub content: Bytes,
}

/// How a batch reacts to an individual rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop at the first rejected file.
    #[default]
    FailFast,
    /// Validate every file and report all rejections. Useful for UIs that list
    /// every problem at once.
    CollectAll,
}

/// Result of [`validate_batch_with`].
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub accepted: Vec<ValidatedUpload>,
    pub rejected: Vec<UploadRejection>,
}

impl BatchReport {
    pub fn is_accepted(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Fail-fast view: every accepted file, or the first rejection.
    pub fn into_result(self) -> Result<Vec<ValidatedUpload>, UploadRejection> {
        match self.rejected.into_iter().next() {
            Some(rejection) => Err(rejection),
            None => Ok(self.accepted),
        }
    }
}

/// `true` iff `0 < size <= MAX_FILE_SIZE`.
pub fn validate_size(size: u64) -> bool {
    size > 0 && size <= MAX_FILE_SIZE
}

/// `true` iff `total <= MAX_TOTAL_SIZE`. An empty batch totals 0 and passes.
pub fn validate_total_size(total: u64) -> bool {
    total <= MAX_TOTAL_SIZE
}

/// Validate a single upload.
///
/// The declared size is checked before the content is read. The content is then
/// sniffed; filename and client MIME type play no part in the decision.
pub async fn validate_one<S>(file: &S) -> Result<ValidatedUpload, UploadRejection>
where
    S: UploadSource + ?Sized,
{
    let filename = file.name().to_string();
    let declared = file.size();

    if !validate_size(declared) {
        return Err(UploadRejection::SizeExceeded {
            filename,
            size: declared,
            max: MAX_FILE_SIZE,
        });
    }

    let content = file
        .read_all()
        .await
        .map_err(|e| UploadRejection::Unreadable {
            filename: filename.clone(),
            reason: e.to_string(),
        })?;

    // A source may deliver more than it declared; the cap applies to what was read too.
    let actual = content.len() as u64;
    if actual > MAX_FILE_SIZE {
        return Err(UploadRejection::SizeExceeded {
            filename,
            size: actual,
            max: MAX_FILE_SIZE,
        });
    }

    match detect_kind(&content) {
        Some(kind) => {
            tracing::debug!(filename = %filename, kind = %kind, size_bytes = declared, "Upload accepted");
            Ok(ValidatedUpload {
                name: filename,
                size: declared,
                kind,
                content,
            })
        }
        None => Err(UploadRejection::UnrecognizedContent { filename }),
    }
}

/// Validate a batch, stopping at the first rejection.
///
/// The summed declared size is checked before any file content is read.
pub async fn validate_batch<S>(files: &[S]) -> Result<Vec<ValidatedUpload>, UploadRejection>
where
    S: UploadSource,
{
    validate_batch_with(files, BatchPolicy::FailFast)
        .await
        .into_result()
}

/// Validate a batch under an explicit [`BatchPolicy`].
///
/// Both policies run the aggregate size check first; when it fails the report
/// holds only `TotalSizeExceeded` and no source has been read. Under `FailFast`
/// the report keeps files accepted before the rejection.
pub async fn validate_batch_with<S>(files: &[S], policy: BatchPolicy) -> BatchReport
where
    S: UploadSource,
{
    let mut report = BatchReport::default();
    if files.is_empty() {
        return report;
    }

    let total = files
        .iter()
        .fold(0u64, |acc, file| acc.saturating_add(file.size()));
    if !validate_total_size(total) {
        let rejection = UploadRejection::TotalSizeExceeded {
            total,
            max: MAX_TOTAL_SIZE,
        };
        tracing::debug!(code = rejection.code(), total_bytes = total, "Upload batch rejected");
        report.rejected.push(rejection);
        return report;
    }

    for file in files {
        match validate_one(file).await {
            Ok(upload) => report.accepted.push(upload),
            Err(rejection) => {
                tracing::debug!(
                    code = rejection.code(),
                    filename = %file.name(),
                    "Upload rejected"
                );
                report.rejected.push(rejection);
                if policy == BatchPolicy::FailFast {
                    break;
                }
            }
        }
    }

    report
}
