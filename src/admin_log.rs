//! Admin log collaborator
//!
//! Unexpected failures caught by the naming service are handed to an `AdminLog` so
//! operators see the raw error while callers only get a generic message.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::error;

/// One unexpected failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogEntry {
    /// Error category, see `NamingError::kind`
    pub kind: String,
    /// Operation that failed, e.g. `generate`
    pub source: String,
    /// Raw error text
    pub message: String,
    pub resource_type: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl AdminLogEntry {
    pub fn new(
        kind: impl Into<String>,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            source: source.into(),
            message: message.into(),
            resource_type: None,
            created_on: Utc::now(),
        }
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }
}

#[async_trait]
pub trait AdminLog: Send + Sync {
    async fn record(&self, entry: AdminLogEntry);
}

/// Forwards entries to `tracing` at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAdminLog;

#[async_trait]
impl AdminLog for TracingAdminLog {
    async fn record(&self, entry: AdminLogEntry) {
        error!(
            kind = %entry.kind,
            source = %entry.source,
            resource_type = entry.resource_type.as_deref().unwrap_or(""),
            "{}",
            entry.message
        );
    }
}

/// Keeps entries in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryAdminLog {
    entries: Mutex<Vec<AdminLogEntry>>,
}

impl MemoryAdminLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AdminLogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AdminLog for MemoryAdminLog {
    async fn record(&self, entry: AdminLogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_admin_log_keeps_entries() {
        let log = MemoryAdminLog::new();
        let entry =
            AdminLogEntry::new("persistence", "generate", "disk full").with_resource_type("vm");
        log.record(entry).await;
        TracingAdminLog
            .record(AdminLogEntry::new("internal", "bulk", "boom"))
            .await;

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].resource_type.as_deref(), Some("vm"));
        assert_eq!(entries[0].message, "disk full");
    }
}
