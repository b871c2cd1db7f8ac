//! Validate a batch of uploads and persist the accepted files.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use launchpad_storage::{keys::validate_folder, upload_key, Storage, StorageError};
use launchpad_upload::{validate_batch, ImageKind, UploadRejection, UploadSource};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::HttpAppError;

/// A stored upload as returned to the client
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredUpload {
    /// Storage key, `{folder}/{user_id}/{timestamp}-{filename}`
    pub key: String,
    #[schema(value_type = String, example = "png")]
    pub kind: ImageKind,
    pub size: u64,
    /// Time-limited GET URL
    pub url: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Rejected(rejection) => rejection.into(),
            UploadError::Storage(err) => err.into(),
        }
    }
}

/// Run the fail-fast batch validator, then store every accepted file under
/// `{folder}/{owner}/...` with the detected MIME type.
///
/// Nothing is written unless the whole batch is accepted. If a write fails
/// midway, the files already written for this batch are removed again.
#[tracing::instrument(skip(storage, files), fields(file_count = files.len()))]
pub async fn store_uploads<S: UploadSource>(
    storage: &dyn Storage,
    folder: &str,
    owner: Uuid,
    files: &[S],
    url_ttl: Duration,
) -> Result<Vec<StoredUpload>, UploadError> {
    validate_folder(folder)?;

    let accepted = validate_batch(files).await?;

    let mut used_keys = HashSet::with_capacity(accepted.len());
    let mut stored: Vec<StoredUpload> = Vec::with_capacity(accepted.len());

    for upload in accepted {
        let mut timestamp = Utc::now().timestamp_millis();
        let mut key = upload_key(folder, owner, &upload.name, timestamp)?;
        // Same name within the same millisecond
        while used_keys.contains(&key) {
            timestamp += 1;
            key = upload_key(folder, owner, &upload.name, timestamp)?;
        }
        used_keys.insert(key.clone());

        let result = async {
            storage
                .put(&key, upload.content.clone(), upload.kind.mime_type())
                .await?;
            storage.signed_url(&key, url_ttl).await
        }
        .await;

        match result {
            Ok(url) => {
                tracing::info!(key = %key, kind = %upload.kind, size = upload.size, "Upload stored");
                stored.push(StoredUpload {
                    key,
                    kind: upload.kind,
                    size: upload.size,
                    url,
                });
            }
            Err(err) => {
                tracing::error!(key = %key, error = %err, "Failed to store upload, rolling back batch");
                for done in &stored {
                    if let Err(cleanup_err) = storage.delete(&done.key).await {
                        tracing::warn!(key = %done.key, error = %cleanup_err, "Failed to remove partial upload");
                    }
                }
                if let Err(cleanup_err) = storage.delete(&key).await {
                    tracing::warn!(key = %key, error = %cleanup_err, "Failed to remove partial upload");
                }
                return Err(err.into());
            }
        }
    }

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use launchpad_storage::{LocalStorage, StorageBackend, StorageResult};
    use launchpad_upload::MemoryUpload;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    async fn storage(dir: &TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepted_batch_is_stored_under_owner() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let owner = Uuid::new_v4();
        let files = vec![
            MemoryUpload::new("a.png", PNG.to_vec()),
            MemoryUpload::new("a.png", PNG.to_vec()),
        ];

        let stored = store_uploads(&storage, "avatars", owner, &files, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].key, stored[1].key);
        for upload in &stored {
            assert!(upload.key.starts_with(&format!("avatars/{}/", owner)));
            assert!(upload.key.ends_with("-a.png"));
            assert_eq!(upload.kind, ImageKind::Png);
            assert!(storage.exists(&upload.key).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_rejected_batch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let files = vec![
            MemoryUpload::new("ok.png", PNG.to_vec()),
            MemoryUpload::new("notes.txt", b"hello world".to_vec()),
        ];

        let err = store_uploads(&storage, "uploads", Uuid::new_v4(), &files, Duration::from_secs(60))
            .await
            .unwrap_err();

        match err {
            UploadError::Rejected(UploadRejection::UnrecognizedContent { filename }) => {
                assert_eq!(filename, "notes.txt")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    /// Local storage whose second `put` fails and whose deletes of the failed
    /// key fail too
    struct FailingSecondPut {
        inner: LocalStorage,
        puts: Mutex<u32>,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Storage for FailingSecondPut {
        async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
            let attempt = {
                let mut puts = self.puts.lock().unwrap();
                *puts += 1;
                *puts
            };
            if attempt == 2 {
                return Err(StorageError::UploadFailed("disk full".to_string()));
            }
            self.inner.put(key, data, content_type).await
        }

        async fn get(&self, key: &str) -> StorageResult<Bytes> {
            self.inner.get(key).await
        }

        async fn delete(&self, key: &str) -> StorageResult<()> {
            self.deleted.lock().unwrap().push(key.to_string());
            if !self.inner.exists(key).await? {
                return Err(StorageError::NotFound(key.to_string()));
            }
            self.inner.delete(key).await
        }

        async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
            self.inner.signed_url(key, expires_in).await
        }

        async fn exists(&self, key: &str) -> StorageResult<bool> {
            self.inner.exists(key).await
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back_stored_files() {
        let dir = TempDir::new().unwrap();
        let storage = FailingSecondPut {
            inner: storage(&dir).await,
            puts: Mutex::new(0),
            deleted: Mutex::new(Vec::new()),
        };
        let files = vec![
            MemoryUpload::new("first.png", PNG.to_vec()),
            MemoryUpload::new("second.png", PNG.to_vec()),
        ];

        let err = store_uploads(&storage, "uploads", Uuid::new_v4(), &files, Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Storage(StorageError::UploadFailed(_))));

        // Both keys are cleaned up even though removing the failed one errors
        let deleted = storage.deleted.lock().unwrap().clone();
        assert_eq!(deleted.len(), 2);
        assert!(deleted[0].ends_with("-first.png"));
        assert!(deleted[1].ends_with("-second.png"));
        assert!(!storage.inner.exists(&deleted[0]).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_folder_is_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let files = vec![MemoryUpload::new("ok.png", PNG.to_vec())];

        let err = store_uploads(&storage, "../etc", Uuid::new_v4(), &files, Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Storage(StorageError::InvalidKey(_))));
    }
}
