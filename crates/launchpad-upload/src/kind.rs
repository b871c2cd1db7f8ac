use serde::{Deserialize, Serialize};

const PNG_SIGNATURES: &[&[u8]] = &[&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]];

const JPEG_SIGNATURES: &[&[u8]] = &[
    &[0xFF, 0xD8, 0xFF, 0xE0],
    &[0xFF, 0xD8, 0xFF, 0xE1],
    &[0xFF, 0xD8, 0xFF, 0xE2],
    &[0xFF, 0xD8, 0xFF, 0xDB],
    &[0xFF, 0xD8, 0xFF, 0xEE],
];

// GIF87a, GIF89a
const GIF_SIGNATURES: &[&[u8]] = &[
    &[0x47, 0x49, 0x46, 0x38, 0x37, 0x61],
    &[0x47, 0x49, 0x46, 0x38, 0x39, 0x61],
];

// RIFF container; the form type at offset 8 must be WEBP
const WEBP_SIGNATURES: &[&[u8]] = &[&[0x52, 0x49, 0x46, 0x46]];
const WEBP_MARKER_OFFSET: usize = 8;
const WEBP_MARKER: &[u8] = b"WEBP";

/// Image formats accepted for upload.
///
/// The set is closed. Detection walks [`ImageKind::ALL`] in order and each kind's
/// signatures in order, so the result for a given buffer never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    /// All kinds in detection order.
    pub const ALL: [ImageKind; 4] = [
        ImageKind::Png,
        ImageKind::Jpeg,
        ImageKind::Gif,
        ImageKind::Webp,
    ];

    /// Canonical dotted extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => ".png",
            ImageKind::Jpeg => ".jpg",
            ImageKind::Gif => ".gif",
            ImageKind::Webp => ".webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
        }
    }

    /// Name shown to end users.
    pub fn label(self) -> &'static str {
        match self {
            ImageKind::Png => "PNG",
            ImageKind::Jpeg => "JPEG",
            ImageKind::Gif => "GIF",
            ImageKind::Webp => "WEBP",
        }
    }

    /// Byte prefixes (from offset 0) identifying this kind.
    pub fn signatures(self) -> &'static [&'static [u8]] {
        match self {
            ImageKind::Png => PNG_SIGNATURES,
            ImageKind::Jpeg => JPEG_SIGNATURES,
            ImageKind::Gif => GIF_SIGNATURES,
            ImageKind::Webp => WEBP_SIGNATURES,
        }
    }

    /// Comma separated labels of every kind, e.g. for rejection messages.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn matches(self, bytes: &[u8]) -> bool {
        self.signatures()
            .iter()
            .any(|signature| bytes.starts_with(signature) && self.marker_matches(bytes))
    }

    fn marker_matches(self, bytes: &[u8]) -> bool {
        match self {
            ImageKind::Webp => {
                bytes.get(WEBP_MARKER_OFFSET..WEBP_MARKER_OFFSET + WEBP_MARKER.len())
                    == Some(WEBP_MARKER)
            }
            _ => true,
        }
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Detects the image kind from the leading bytes of `bytes`.
///
/// Returns `None` for empty buffers and for anything outside the allowed set;
/// there is no best-guess fallback.
pub fn detect_kind(bytes: &[u8]) -> Option<ImageKind> {
    ImageKind::ALL.into_iter().find(|kind| kind.matches(bytes))
}
