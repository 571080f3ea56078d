//! In-memory storage backend

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Storage backend keeping files in a map.
///
/// `set_read_only(true)` makes every write fail, which lets callers exercise the
/// persistence failure paths.
#[derive(Default)]
pub struct MemoryStorageBackend {
    files: RwLock<HashMap<String, Vec<u8>>>,
    read_only: AtomicBool,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject all subsequent writes and deletes
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn key(path: &str) -> String {
        path.trim_start_matches('/').to_string()
    }

    fn check_writable(&self, path: &str) -> Result<(), StorageError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::PermissionDenied(format!(
                "Storage is read-only: {}",
                path
            )));
        }
        Ok(())
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("Memory storage lock poisoned".to_string())
    }
}

#[async_trait]
impl StorageBackend for MemoryStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files
            .get(&Self::key(path))
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        self.check_writable(path)?;
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(Self::key(path), content.to_vec());
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        Ok(files.contains_key(&Self::key(path)))
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        self.check_writable(path)?;
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files
            .remove(&Self::key(path))
            .map(|_| ())
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))
    }
}
