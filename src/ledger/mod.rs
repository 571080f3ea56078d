//! Generated name ledger
//!
//! Append-only list of generated names persisted as one JSON array through a storage
//! backend. Id assignment, append and persistence happen under a single lock so
//! concurrent requests never receive the same Id; a failed write removes the record
//! again before the lock is released.
//!
//! Callers that check for a free name before appending hold [`GeneratedNameLedger::reserve`]
//! across the check and the append, so two requests cannot both record the same name.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::error::NamingResult;
use crate::models::{GeneratedNameDraft, GeneratedNameRecord};
use crate::storage::{MemoryStorageBackend, StorageBackend, StorageError};

/// Default ledger file name
pub const DEFAULT_LEDGER_PATH: &str = "generatednames.json";

/// Ledger of generated names backed by a storage backend
pub struct GeneratedNameLedger {
    storage: Arc<dyn StorageBackend>,
    path: String,
    records: Mutex<Vec<GeneratedNameRecord>>,
    reservation: Mutex<()>,
}

impl GeneratedNameLedger {
    /// Load the ledger from `path`; a missing file is an empty ledger
    pub async fn load(
        storage: Arc<dyn StorageBackend>,
        path: impl Into<String>,
    ) -> NamingResult<Self> {
        let path = path.into();

        let mut records: Vec<GeneratedNameRecord> = match storage.read_file(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(StorageError::FileNotFound(_)) => {
                info!(path = %path, "Ledger file not found, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        records.sort_by_key(|r| r.id);

        info!(path = %path, records = records.len(), "Loaded generated name ledger");
        Ok(Self {
            storage,
            path,
            records: Mutex::new(records),
            reservation: Mutex::new(()),
        })
    }

    /// Empty ledger kept in memory only
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryStorageBackend::new()),
            path: DEFAULT_LEDGER_PATH.to_string(),
            records: Mutex::new(Vec::new()),
            reservation: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Exclusive hold over the check-then-append sequence.
    ///
    /// Lookups and `append` do not take this lock, so they can be called while holding it.
    pub async fn reserve(&self) -> MutexGuard<'_, ()> {
        self.reservation.lock().await
    }

    async fn persist(&self, records: &[GeneratedNameRecord]) -> NamingResult<()> {
        let content = serde_json::to_vec_pretty(records)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.storage.write_file(&self.path, &content).await?;
        Ok(())
    }

    /// Assign the next Id, append and persist
    pub async fn append(&self, draft: GeneratedNameDraft) -> NamingResult<GeneratedNameRecord> {
        let mut records = self.records.lock().await;

        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = draft.into_record(id, Utc::now());
        records.push(record.clone());

        if let Err(e) = self.persist(&records).await {
            records.pop();
            warn!(
                id,
                resource_name = %record.resource_name,
                error = %e,
                "Failed to persist generated name"
            );
            return Err(e);
        }

        info!(id, resource_name = %record.resource_name, "Recorded generated name");
        Ok(record)
    }

    /// Whether a record with this name exists (case-insensitive)
    pub async fn contains_name(&self, name: &str) -> bool {
        let records = self.records.lock().await;
        records
            .iter()
            .any(|r| r.resource_name.eq_ignore_ascii_case(name))
    }

    /// Records with this name (case-insensitive)
    pub async fn find_by_name(&self, name: &str) -> Vec<GeneratedNameRecord> {
        let records = self.records.lock().await;
        records
            .iter()
            .filter(|r| r.resource_name.eq_ignore_ascii_case(name))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: i64) -> Option<GeneratedNameRecord> {
        let records = self.records.lock().await;
        records.iter().find(|r| r.id == id).cloned()
    }

    /// All records ordered by Id
    pub async fn records(&self) -> Vec<GeneratedNameRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Remove every record; returns how many were removed
    pub async fn purge(&self) -> NamingResult<usize> {
        let mut records = self.records.lock().await;
        self.persist(&[]).await?;
        let removed = records.len();
        records.clear();
        info!(removed, "Purged generated name ledger");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NamingError;

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let ledger = GeneratedNameLedger::in_memory();
        let first = ledger.append(GeneratedNameDraft::new("vm-eus-001", "vm")).await.unwrap();
        let second = ledger.append(GeneratedNameDraft::new("vm-eus-002", "vm")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(ledger.contains_name("VM-EUS-002").await);
    }

    #[tokio::test]
    async fn test_load_missing_and_existing_file() {
        let storage = Arc::new(MemoryStorageBackend::new());
        let ledger = GeneratedNameLedger::load(storage.clone(), DEFAULT_LEDGER_PATH)
            .await
            .unwrap();
        assert!(ledger.is_empty().await);

        ledger.append(GeneratedNameDraft::new("rg-prd", "rg")).await.unwrap();

        let reloaded = GeneratedNameLedger::load(storage, DEFAULT_LEDGER_PATH).await.unwrap();
        assert_eq!(reloaded.len().await, 1);
        assert_eq!(reloaded.get(1).await.unwrap().resource_name, "rg-prd");
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let storage = Arc::new(MemoryStorageBackend::new());
        let ledger = GeneratedNameLedger::load(storage.clone(), DEFAULT_LEDGER_PATH)
            .await
            .unwrap();
        storage.set_read_only(true);

        let result = ledger.append(GeneratedNameDraft::new("rg-prd", "rg")).await;
        assert!(matches!(result, Err(NamingError::Persistence(_))));
        assert!(ledger.is_empty().await);

        storage.set_read_only(false);
        let record = ledger.append(GeneratedNameDraft::new("rg-prd", "rg")).await.unwrap();
        assert_eq!(record.id, 1);
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_unique_ids() {
        let ledger = Arc::new(GeneratedNameLedger::in_memory());
        let mut handles = Vec::new();
        for i in 0..25 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .append(GeneratedNameDraft::new(format!("name-{i}"), "vm"))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        assert_eq!(ids, (1..=25).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_reservation_is_exclusive() {
        let ledger = GeneratedNameLedger::in_memory();
        let guard = ledger.reserve().await;

        assert!(ledger.reservation.try_lock().is_err());
        assert!(!ledger.contains_name("vm-eus-001").await);
        ledger.append(GeneratedNameDraft::new("vm-eus-001", "vm")).await.unwrap();

        drop(guard);
        assert!(ledger.reservation.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_purge() {
        let ledger = GeneratedNameLedger::in_memory();
        ledger.append(GeneratedNameDraft::new("a", "vm")).await.unwrap();
        ledger.append(GeneratedNameDraft::new("b", "vm")).await.unwrap();
        assert_eq!(ledger.purge().await.unwrap(), 2);
        assert!(ledger.is_empty().await);
    }
}
