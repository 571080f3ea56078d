//! Existence checks for candidate names
//!
//! The conflict resolver only depends on the `ExistenceChecker` contract. The bundled
//! `LedgerExistenceChecker` answers from the generated name ledger and, when
//! configured, asks a remote oracle (e.g. an Azure tenant query client) through the
//! `RemoteNameLookup` trait. Remote failures and timeouts never fail the check: they
//! turn into a warning and the name is treated as unknown remotely.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::error::{NamingError, NamingResult};
use crate::ledger::GeneratedNameLedger;

/// Default time allowed for a remote lookup
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Answer of an existence check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistenceReport {
    pub exists_locally: bool,
    pub exists_remotely: bool,
    /// Ledger entries (`ledger/{id}`) and remote resource ids holding the name
    pub conflicting_ids: Vec<String>,
    /// Set when the remote lookup could not be completed
    pub warning: Option<String>,
}

impl ExistenceReport {
    pub fn exists(&self) -> bool {
        self.exists_locally || self.exists_remotely
    }
}

/// Reports whether a name is already taken
#[async_trait]
pub trait ExistenceChecker: Send + Sync {
    async fn exists(&self, name: &str, resource_type: &str) -> NamingResult<ExistenceReport>;
}

/// External source of existing resource names
#[async_trait]
pub trait RemoteNameLookup: Send + Sync {
    /// Ids of existing resources carrying `name`; empty when the name is free
    async fn find_existing(&self, name: &str, resource_type: &str) -> NamingResult<Vec<String>>;
}

/// Existence checker backed by the ledger and an optional remote lookup
pub struct LedgerExistenceChecker {
    ledger: Arc<GeneratedNameLedger>,
    remote: Option<Arc<dyn RemoteNameLookup>>,
    remote_timeout: Duration,
}

impl LedgerExistenceChecker {
    pub fn new(ledger: Arc<GeneratedNameLedger>) -> Self {
        Self {
            ledger,
            remote: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteNameLookup>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    async fn check_remote(
        &self,
        remote: &dyn RemoteNameLookup,
        name: &str,
        resource_type: &str,
    ) -> NamingResult<Vec<String>> {
        let lookup = remote.find_existing(name, resource_type);
        match tokio::time::timeout(self.remote_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(NamingError::ExternalService(format!(
                "Remote name lookup timed out after {} ms",
                self.remote_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl ExistenceChecker for LedgerExistenceChecker {
    async fn exists(&self, name: &str, resource_type: &str) -> NamingResult<ExistenceReport> {
        let local = self.ledger.find_by_name(name).await;

        let mut report = ExistenceReport {
            exists_locally: !local.is_empty(),
            conflicting_ids: local.iter().map(|r| format!("ledger/{}", r.id)).collect(),
            ..Default::default()
        };

        if let Some(remote) = &self.remote {
            match self.check_remote(remote.as_ref(), name, resource_type).await {
                Ok(ids) => {
                    report.exists_remotely = !ids.is_empty();
                    report.conflicting_ids.extend(ids);
                }
                Err(e) => {
                    warn!(
                        candidate = name,
                        resource_type,
                        error = %e,
                        "Remote existence check failed"
                    );
                    report.warning = Some(format!(
                        "Remote name validation could not be completed: {}",
                        e
                    ));
                }
            }
        }

        Ok(report)
    }
}
