//! Where candidate upload bytes come from.
//!
//! Reading is the only I/O the validator performs, so it sits behind
//! [`UploadSource`]: multipart bodies arrive as [`MemoryUpload`], files on disk
//! (the CLI) as [`FileUpload`].

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};

/// A candidate upload: declared name, declared size and a byte accessor.
#[async_trait]
pub trait UploadSource: Send + Sync {
    /// Client-declared filename
    fn name(&self) -> &str;

    /// Declared size in bytes, checked before any content is read
    fn size(&self) -> u64;

    /// Read the full content
    async fn read_all(&self) -> io::Result<Bytes>;
}

/// Upload already buffered in memory.
#[derive(Debug, Clone)]
pub struct MemoryUpload {
    name: String,
    declared_size: u64,
    content: Bytes,
    content_type: Option<String>,
}

impl MemoryUpload {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            declared_size: content.len() as u64,
            content,
            content_type: None,
        }
    }

    /// Override the declared size (e.g. from a `Content-Length` part header).
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = size;
        self
    }

    /// Record the client-supplied content type. Kept for logging only.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

#[async_trait]
impl UploadSource for MemoryUpload {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.declared_size
    }

    async fn read_all(&self) -> io::Result<Bytes> {
        Ok(self.content.clone())
    }
}

/// Upload backed by a file on disk. The declared size comes from the file
/// metadata taken when the source is opened.
#[derive(Debug, Clone)]
pub struct FileUpload {
    path: PathBuf,
    name: String,
    size: u64,
}

impl FileUpload {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path,
            name,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UploadSource for FileUpload {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_all(&self) -> io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }
}
