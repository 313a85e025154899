//! Object storage for uploaded file content.
//!
//! The real deployment target is an S3-compatible object store; this
//! module keeps that boundary as a trait and ships a local-directory
//! implementation. File content is immutable once stored — there is no
//! overwrite operation, only put and delete.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

/// Characters allowed to survive into a storage key. Everything else
/// collapses to a single dash.
static KEY_SANITIZER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileStoreError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("source file not found: {0}")]
    SourceMissing(PathBuf),
    #[error("file store I/O failure: {0}")]
    Io(String),
}

/// Object store boundary: put immutable content under a key, delete it,
/// resolve it for download.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Copy `source` into the store under `key`. Returns the byte size
    /// of the stored object.
    async fn put(&self, key: &str, source: &Path) -> Result<u64, FileStoreError>;

    /// Remove the object. Returns false if the key was absent.
    async fn delete(&self, key: &str) -> Result<bool, FileStoreError>;

    /// Whether an object exists under this key.
    async fn contains(&self, key: &str) -> bool;
}

/// Directory-backed file store.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path of the object behind a key.
    pub fn object_path(&self, key: &str) -> Result<PathBuf, FileStoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, key: &str, source: &Path) -> Result<u64, FileStoreError> {
        let dest = self.object_path(key)?;
        if !source.exists() {
            return Err(FileStoreError::SourceMissing(source.to_path_buf()));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| FileStoreError::Io(e.to_string()))?;

        let bytes = tokio::fs::copy(source, &dest)
            .await
            .map_err(|e| FileStoreError::Io(e.to_string()))?;

        tracing::debug!("Stored {} ({} bytes)", key, bytes);
        Ok(bytes)
    }

    async fn delete(&self, key: &str) -> Result<bool, FileStoreError> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileStoreError::Io(e.to_string())),
        }
    }

    async fn contains(&self, key: &str) -> bool {
        match self.object_path(key) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// Build a storage key from a record id and the original file name.
/// The id prefix keeps keys unique even for identical filenames.
pub fn storage_key(id: uuid::Uuid, file_name: &str) -> String {
    format!("{}-{}", id, sanitize_file_name(file_name))
}

/// Collapse anything outside `[A-Za-z0-9._-]` to a dash and trim the
/// result, so keys are safe as path components on any platform.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized = KEY_SANITIZER.replace_all(name, "-");
    let trimmed = sanitized.trim_matches(['-', '.']);
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

fn validate_key(key: &str) -> Result<(), FileStoreError> {
    // No separators means no traversal; a dots-only key would alias the
    // store directory itself.
    if key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || key.chars().all(|c| c == '.')
    {
        return Err(FileStoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
