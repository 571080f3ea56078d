//! File system storage backend
//!
//! Keeps ledger and configuration files below a single base directory. Paths
//! containing ".." are rejected. Writes go to a sibling temporary file that is renamed
//! over the target, so a crash never leaves a half-written ledger behind.

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File system storage backend
pub struct FileSystemStorageBackend {
    base_path: PathBuf,
}

impl FileSystemStorageBackend {
    /// Create a new file system storage backend rooted at `base_path`
    ///
    /// # Example
    ///
    /// ```rust
    /// use resource_naming_sdk::storage::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new("/var/lib/naming");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Base directory of this backend
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let normalized = path.trim_start_matches('/');
        if normalized.is_empty() {
            return Err(StorageError::PermissionDenied(
                "Empty path not allowed".to_string(),
            ));
        }

        let relative = Path::new(normalized);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(StorageError::PermissionDenied(format!(
                        "Path '{}' escapes the storage directory",
                        path
                    )));
                }
            }
        }

        Ok(self.base_path.join(relative))
    }

    fn map_io(path: &str, action: &str, err: std::io::Error) -> StorageError {
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::FileNotFound(path.to_string())
        } else {
            StorageError::IoError(format!("Failed to {} {}: {}", action, path, err))
        }
    }
}

#[async_trait]
impl StorageBackend for FileSystemStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve_path(path)?;
        fs::read(&full_path)
            .await
            .map_err(|e| Self::map_io(path, "read", e))
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::IoError(format!("Failed to create directory for {}: {}", path, e))
            })?;
        }

        let mut temp_path = full_path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        fs::write(&temp_path, content)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write {}: {}", path, e)))?;
        fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to replace {}: {}", path, e)))?;

        debug!(path = %full_path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve_path(path)?;
        match fs::metadata(&full_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::map_io(path, "inspect", e)),
        }
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;
        fs::remove_file(&full_path)
            .await
            .map_err(|e| Self::map_io(path, "delete", e))
    }
}
