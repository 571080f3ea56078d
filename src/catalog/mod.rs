//! Component catalog
//!
//! The catalog hands the naming pipeline a read-only snapshot of the configured
//! components, resource types and component options. Configuration storage and its
//! CRUD handlers live outside this crate; they only need to invalidate the cached
//! snapshot after a change.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::{Cache, InMemoryCache};
use crate::config::NamingConfiguration;
use crate::error::NamingResult;
use crate::models::{
    ComponentDefinition, ComponentOption, ResourceTypeDefinition, ShortNameCase,
    apply_short_name_case, component_key,
};

/// Cache key of the catalog snapshot
pub const CATALOG_CACHE_KEY: &str = "catalog";

/// Immutable view of the naming configuration entities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub components: Vec<ComponentDefinition>,
    pub resource_types: Vec<ResourceTypeDefinition>,
    pub options: Vec<ComponentOption>,
}

impl CatalogSnapshot {
    /// Enabled resource type by short name (case-insensitive)
    pub fn resource_type(&self, short_name: &str) -> Option<&ResourceTypeDefinition> {
        self.resource_types
            .iter()
            .find(|rt| rt.enabled && rt.short_name.eq_ignore_ascii_case(short_name))
    }

    /// Component by normalised key, enabled or not
    pub fn component(&self, key: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| c.key() == key)
    }

    /// Short name of the enabled option whose name or short name matches `value`
    pub fn option_short_name(&self, key: &str, value: &str) -> Option<&str> {
        self.options
            .iter()
            .filter(|o| o.enabled && component_key(&o.component) == key)
            .find(|o| {
                o.name.eq_ignore_ascii_case(value) || o.short_name.eq_ignore_ascii_case(value)
            })
            .map(|o| o.short_name.as_str())
    }
}

/// Source of catalog snapshots
#[async_trait]
pub trait ComponentCatalog: Send + Sync {
    async fn snapshot(&self) -> NamingResult<Arc<CatalogSnapshot>>;

    /// Drop any cached snapshot after a configuration change
    fn invalidate(&self) {}
}

/// Catalog built once from a configuration
pub struct StaticCatalog {
    snapshot: Arc<CatalogSnapshot>,
}

impl StaticCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    /// Build from configuration, applying the configured short name case
    pub fn from_configuration(config: &NamingConfiguration) -> Self {
        let case = config.settings.short_name_case;
        let mut snapshot = CatalogSnapshot {
            components: config.components.clone(),
            resource_types: config.resource_types.clone(),
            options: config.component_options.clone(),
        };

        if case != ShortNameCase::Preserve {
            for resource_type in &mut snapshot.resource_types {
                apply_short_name_case(resource_type, case);
            }
            for option in &mut snapshot.options {
                apply_short_name_case(option, case);
            }
        }

        Self::new(snapshot)
    }
}

#[async_trait]
impl ComponentCatalog for StaticCatalog {
    async fn snapshot(&self) -> NamingResult<Arc<CatalogSnapshot>> {
        Ok(self.snapshot.clone())
    }
}

/// Caches another catalog's snapshot for a fixed time-to-live
pub struct CachedCatalog {
    inner: Arc<dyn ComponentCatalog>,
    cache: Arc<dyn Cache<Arc<CatalogSnapshot>>>,
    ttl: Duration,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn ComponentCatalog>, ttl: Duration) -> Self {
        let cache: Arc<dyn Cache<Arc<CatalogSnapshot>>> = Arc::new(InMemoryCache::new());
        Self::with_cache(inner, cache, ttl)
    }

    pub fn with_cache(
        inner: Arc<dyn ComponentCatalog>,
        cache: Arc<dyn Cache<Arc<CatalogSnapshot>>>,
        ttl: Duration,
    ) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl ComponentCatalog for CachedCatalog {
    async fn snapshot(&self) -> NamingResult<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.cache.get(CATALOG_CACHE_KEY) {
            return Ok(snapshot);
        }

        debug!("Catalog cache miss, loading snapshot");
        let snapshot = self.inner.snapshot().await?;
        self.cache.set(CATALOG_CACHE_KEY, snapshot.clone(), self.ttl);
        Ok(snapshot)
    }

    fn invalidate(&self) {
        self.cache.invalidate(CATALOG_CACHE_KEY);
        self.inner.invalidate();
    }
}
