//! Batch validation must not touch content when the aggregate size is over budget.

use async_trait::async_trait;
use bytes::Bytes;
use launchpad_upload::{
    validate_batch, validate_batch_with, BatchPolicy, ImageKind, UploadRejection, UploadSource,
    MAX_TOTAL_SIZE,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const MIB: u64 = 1024 * 1024;

struct CountingUpload {
    name: String,
    declared: u64,
    content: Bytes,
    reads: Arc<AtomicUsize>,
}

impl CountingUpload {
    fn new(name: &str, declared: u64, content: &'static [u8], reads: &Arc<AtomicUsize>) -> Self {
        Self {
            name: name.to_string(),
            declared,
            content: Bytes::from_static(content),
            reads: reads.clone(),
        }
    }
}

#[async_trait]
impl UploadSource for CountingUpload {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.declared
    }

    async fn read_all(&self) -> io::Result<Bytes> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.content.clone())
    }
}

struct BrokenUpload;

#[async_trait]
impl UploadSource for BrokenUpload {
    fn name(&self) -> &str {
        "broken.png"
    }

    fn size(&self) -> u64 {
        10
    }

    async fn read_all(&self) -> io::Result<Bytes> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed"))
    }
}

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

#[tokio::test]
async fn total_size_rejection_reads_no_bytes() {
    let reads = Arc::new(AtomicUsize::new(0));
    let files = vec![
        CountingUpload::new("first.png", 10 * MIB, PNG, &reads),
        CountingUpload::new("second.png", 11 * MIB, PNG, &reads),
    ];

    let err = validate_batch(&files).await.unwrap_err();
    assert!(matches!(err, UploadRejection::TotalSizeExceeded { .. }));
    assert_eq!(reads.load(Ordering::SeqCst), 0);

    let report = validate_batch_with(&files, BatchPolicy::CollectAll).await;
    assert_eq!(report.rejected.len(), 1);
    assert!(report.accepted.is_empty());
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn total_size_boundary_passes() {
    let reads = Arc::new(AtomicUsize::new(0));
    let files = vec![
        CountingUpload::new("a.png", 5 * MIB, PNG, &reads),
        CountingUpload::new("b.png", 5 * MIB, PNG, &reads),
        CountingUpload::new("c.png", 5 * MIB, PNG, &reads),
        CountingUpload::new("d.png", MAX_TOTAL_SIZE - 15 * MIB, PNG, &reads),
    ];

    let accepted = validate_batch(&files).await.unwrap();
    assert_eq!(accepted.len(), 4);
    assert!(accepted.iter().all(|u| u.kind == ImageKind::Png));
    assert_eq!(reads.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn fail_fast_leaves_later_files_unread() {
    let reads = Arc::new(AtomicUsize::new(0));
    let files = vec![
        CountingUpload::new("notes.txt", 5, b"hello", &reads),
        CountingUpload::new("later.png", 10, PNG, &reads),
    ];

    let err = validate_batch(&files).await.unwrap_err();
    assert_eq!(err.code(), "UNRECOGNIZED_CONTENT");
    assert_eq!(reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn read_failures_become_rejections() {
    let files = vec![BrokenUpload];
    let err = validate_batch(&files).await.unwrap_err();
    assert_eq!(err.code(), "UNREADABLE");
    assert!(err.to_string().contains("broken.png"));
}
