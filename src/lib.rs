//! Resource Naming SDK - Name generation for cloud resources
//!
//! Provides unified interfaces for:
//! - Naming configuration (components, resource types, settings)
//! - Name assembly and validation against resource type rules
//! - Conflict resolution against a generated name ledger and remote lookups
//! - Single, validate-only and bulk request orchestration
//! - Ledger persistence (via storage backends)

pub mod admin_log;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod existence;
pub mod ledger;
pub mod models;
pub mod naming;
pub mod resolution;
pub mod service;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use storage::{MemoryStorageBackend, StorageBackend, StorageError};
#[cfg(feature = "native-fs")]
pub use storage::FileSystemStorageBackend;

pub use admin_log::{AdminLog, AdminLogEntry, MemoryAdminLog, TracingAdminLog};
pub use cache::{Cache, InMemoryCache};
pub use catalog::{CachedCatalog, CatalogSnapshot, ComponentCatalog, StaticCatalog};
pub use config::{ConflictResolutionSettings, ConflictStrategy, NamingConfiguration, NamingSettings};
pub use error::{NamingError, NamingResult};
pub use existence::{ExistenceChecker, ExistenceReport, LedgerExistenceChecker, RemoteNameLookup};
pub use ledger::{DEFAULT_LEDGER_PATH, GeneratedNameLedger};
pub use naming::{AssembledName, NameAssembler};
pub use resolution::{ConflictResolver, InstanceRebuilder, ResolutionResult};
pub use service::NamingService;
pub use validation::{NameValidator, ValidationResult};

// Re-export models
pub use models::{
    AzureValidationMetadata, BulkResourceNameRequest, BulkResourceNameResponse,
    BulkResourceNameResult, ComponentDefinition, ComponentOption, ComponentValues,
    GeneratedNameRecord, HasShortName, ResourceNameRequest, ResourceNameResponse,
    ResourceTypeDefinition, ShortNameCase, ValidateNameRequest, ValidateNameResponse,
};
