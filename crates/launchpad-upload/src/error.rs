use crate::kind::ImageKind;

const MIB: u64 = 1024 * 1024;

fn in_mib(bytes: &u64) -> u64 {
    *bytes / MIB
}

/// Why an upload (or a whole batch) was refused.
///
/// The `Display` text names the offending file and is meant to be shown to the
/// end user as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File \"{filename}\" must be between 1 byte and {} MB (got {size} bytes)", in_mib(.max))]
    SizeExceeded {
        filename: String,
        size: u64,
        max: u64,
    },

    #[error("Total upload size of {total} bytes exceeds the {} MB limit", in_mib(.max))]
    TotalSizeExceeded { total: u64, max: u64 },

    #[error("File \"{filename}\" is not an allowed image type (allowed: {})", ImageKind::allowed_list())]
    UnrecognizedContent { filename: String },

    #[error("File \"{filename}\" could not be read: {reason}")]
    Unreadable { filename: String, reason: String },
}

impl UploadRejection {
    /// Machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            UploadRejection::SizeExceeded { .. } => "SIZE_EXCEEDED",
            UploadRejection::TotalSizeExceeded { .. } => "TOTAL_SIZE_EXCEEDED",
            UploadRejection::UnrecognizedContent { .. } => "UNRECOGNIZED_CONTENT",
            UploadRejection::Unreadable { .. } => "UNREADABLE",
        }
    }

    /// File the rejection is about; `None` for batch-level rejections.
    pub fn filename(&self) -> Option<&str> {
        match self {
            UploadRejection::SizeExceeded { filename, .. }
            | UploadRejection::UnrecognizedContent { filename }
            | UploadRejection::Unreadable { filename, .. } => Some(filename),
            UploadRejection::TotalSizeExceeded { .. } => None,
        }
    }

    pub fn is_size_related(&self) -> bool {
        matches!(
            self,
            UploadRejection::SizeExceeded { .. } | UploadRejection::TotalSizeExceeded { .. }
        )
    }
}
