//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{entity_id}/{timestamp_ms}-{sanitized_filename}`.

use crate::traits::{StorageError, StorageResult};
use std::fmt::Display;

/// Longest single path segment most filesystems accept
const MAX_FILENAME_LENGTH: usize = 255;
/// Longer suffixes are not treated as an extension when truncating
const MAX_EXTENSION_LENGTH: usize = 16;
const FALLBACK_FILENAME: &str = "file";

/// Reduce a client-supplied filename to `[A-Za-z0-9._-]`.
///
/// Directory components are dropped, every other character becomes `_`, runs of
/// dots collapse to one and the result is capped at 255 characters, cutting the
/// stem so the extension survives. Never fails: names with nothing usable left
/// become `file`.
pub fn sanitize_filename(filename: &str) -> String {
    sanitize_filename_within(filename, MAX_FILENAME_LENGTH)
}

fn sanitize_filename_within(filename: &str, max_len: usize) -> String {
    let name_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let mut sanitized = String::with_capacity(name_only.len());
    for c in name_only.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
            c
        } else {
            '_'
        };
        if mapped == '.' && sanitized.ends_with('.') {
            continue;
        }
        sanitized.push(mapped);
    }

    // ASCII only at this point, so byte truncation is char-safe
    truncate_keeping_extension(&mut sanitized, max_len);

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    sanitized
}

fn truncate_keeping_extension(name: &mut String, max_len: usize) {
    if name.len() <= max_len {
        return;
    }

    let extension = name
        .rfind('.')
        .filter(|&idx| idx > 0 && name.len() - idx <= MAX_EXTENSION_LENGTH)
        .map(|idx| name[idx..].to_string());

    if let Some(extension) = extension {
        if extension.len() < max_len {
            name.truncate(max_len - extension.len());
            // A stem ending in '.' would put ".." in front of the extension
            while name.ends_with('.') {
                name.pop();
            }
            if !name.is_empty() {
                name.push_str(&extension);
                return;
            }
        }
    }

    name.truncate(max_len);
}

/// Check that `folder` is a single, non-empty path segment.
pub fn validate_folder(folder: &str) -> StorageResult<()> {
    if folder.is_empty()
        || folder == "."
        || folder.contains("..")
        || !folder
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid folder name: {:?}",
            folder
        )));
    }
    Ok(())
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains("..")
        || key.contains('\\')
        || key.contains('\0')
        || key.split('/').any(str::is_empty)
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Build the storage key for an accepted upload.
pub fn upload_key(
    folder: &str,
    entity_id: impl Display,
    filename: &str,
    timestamp_ms: i64,
) -> StorageResult<String> {
    validate_folder(folder)?;
    // The whole last segment, prefix included, must fit in one path component
    let prefix = format!("{}-", timestamp_ms);
    let file_name =
        sanitize_filename_within(filename, MAX_FILENAME_LENGTH.saturating_sub(prefix.len()));
    let key = format!("{}/{}/{}{}", folder, entity_id, prefix, file_name);
    validate_key(&key)?;
    Ok(key)
}

/// A key produced by [`upload_key`], split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadKey<'a> {
    pub folder: &'a str,
    pub entity_id: &'a str,
    pub file_name: &'a str,
}

impl<'a> UploadKey<'a> {
    /// Parse `{folder}/{entity_id}/{file}`. Returns `None` for anything else.
    pub fn parse(key: &'a str) -> Option<Self> {
        validate_key(key).ok()?;
        let mut parts = key.splitn(3, '/');
        let folder = parts.next()?;
        let entity_id = parts.next()?;
        let file_name = parts.next()?;
        if file_name.contains('/') {
            return None;
        }
        Some(Self {
            folder,
            entity_id,
            file_name,
        })
    }

    /// Whether the key was issued for `entity_id`.
    pub fn belongs_to(&self, entity_id: impl Display) -> bool {
        self.entity_id == entity_id.to_string()
    }
}
