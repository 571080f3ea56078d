//! Naming configuration and settings
//!
//! Configuration is loaded once (JSON or YAML) and validated before use. Strategy and
//! case settings are closed enums, so unknown values are rejected at load time instead
//! of silently falling back to a default.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{NamingError, NamingResult};
use crate::models::{
    ComponentDefinition, ComponentOption, ResourceTypeDefinition, ShortNameCase, default_true,
};
use crate::storage::StorageBackend;

/// How a name collision is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictStrategy {
    /// Increment the instance number until the name is free
    AutoIncrement,
    /// Keep the name and report the conflict
    #[default]
    NotifyOnly,
    /// Reject the request
    Fail,
    /// Append a random suffix until the name is free
    SuffixRandom,
}

impl std::fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictStrategy::AutoIncrement => write!(f, "AutoIncrement"),
            ConflictStrategy::NotifyOnly => write!(f, "NotifyOnly"),
            ConflictStrategy::Fail => write!(f, "Fail"),
            ConflictStrategy::SuffixRandom => write!(f, "SuffixRandom"),
        }
    }
}

impl std::str::FromStr for ConflictStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "autoincrement" => Ok(ConflictStrategy::AutoIncrement),
            "notifyonly" => Ok(ConflictStrategy::NotifyOnly),
            "fail" => Ok(ConflictStrategy::Fail),
            "suffixrandom" => Ok(ConflictStrategy::SuffixRandom),
            _ => Err(format!("Invalid conflict resolution strategy: {}", s)),
        }
    }
}

fn default_max_attempts() -> u32 {
    100
}

fn default_increment_padding() -> usize {
    3
}

fn default_random_suffix_length() -> usize {
    4
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_delimiter() -> String {
    "-".to_string()
}

/// Conflict resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolutionSettings {
    #[serde(default)]
    pub strategy: ConflictStrategy,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Minimum digits of an incremented instance number
    #[serde(default = "default_increment_padding")]
    pub increment_padding: usize,
    #[serde(default = "default_true")]
    pub include_warnings: bool,
    #[serde(default = "default_random_suffix_length")]
    pub random_suffix_length: usize,
}

impl Default for ConflictResolutionSettings {
    fn default() -> Self {
        Self {
            strategy: ConflictStrategy::default(),
            max_attempts: default_max_attempts(),
            increment_padding: default_increment_padding(),
            include_warnings: true,
            random_suffix_length: default_random_suffix_length(),
        }
    }
}

impl ConflictResolutionSettings {
    pub fn new(strategy: ConflictStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_increment_padding(mut self, padding: usize) -> Self {
        self.increment_padding = padding;
        self
    }

    pub fn with_include_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }

    pub fn with_random_suffix_length(mut self, length: usize) -> Self {
        self.random_suffix_length = length;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("maxAttempts must be greater than 0".to_string());
        }
        if self.strategy == ConflictStrategy::SuffixRandom && self.random_suffix_length == 0 {
            return Err("randomSuffixLength must be greater than 0 for SuffixRandom".to_string());
        }
        Ok(())
    }
}

/// Service level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingSettings {
    #[serde(default)]
    pub conflict_resolution: ConflictResolutionSettings,
    /// Run conflict resolution against the ledger and remote lookup
    #[serde(default)]
    pub existence_check_enabled: bool,
    #[serde(default = "default_timeout_ms")]
    pub existence_check_timeout_ms: u64,
    #[serde(default)]
    pub short_name_case: ShortNameCase,
    #[serde(default = "default_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            conflict_resolution: ConflictResolutionSettings::default(),
            existence_check_enabled: false,
            existence_check_timeout_ms: default_timeout_ms(),
            short_name_case: ShortNameCase::default(),
            catalog_cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl NamingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conflict_resolution(mut self, settings: ConflictResolutionSettings) -> Self {
        self.conflict_resolution = settings;
        self
    }

    pub fn with_existence_check(mut self, enabled: bool) -> Self {
        self.existence_check_enabled = enabled;
        self
    }

    pub fn with_existence_check_timeout(mut self, timeout: Duration) -> Self {
        self.existence_check_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_short_name_case(mut self, case: ShortNameCase) -> Self {
        self.short_name_case = case;
        self
    }

    pub fn with_catalog_cache_ttl(mut self, ttl: Duration) -> Self {
        self.catalog_cache_ttl_secs = ttl.as_secs();
        self
    }

    pub fn existence_check_timeout(&self) -> Duration {
        Duration::from_millis(self.existence_check_timeout_ms)
    }

    pub fn catalog_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_cache_ttl_secs)
    }
}

/// Complete naming configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingConfiguration {
    pub components: Vec<ComponentDefinition>,
    pub resource_types: Vec<ResourceTypeDefinition>,
    #[serde(default)]
    pub component_options: Vec<ComponentOption>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub settings: NamingSettings,
}

impl Default for NamingConfiguration {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            resource_types: Vec::new(),
            component_options: Vec::new(),
            delimiter: default_delimiter(),
            settings: NamingSettings::default(),
        }
    }
}

impl NamingConfiguration {
    pub fn new(
        components: Vec<ComponentDefinition>,
        resource_types: Vec<ResourceTypeDefinition>,
    ) -> Self {
        Self {
            components,
            resource_types,
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_settings(mut self, settings: NamingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_options(mut self, options: Vec<ComponentOption>) -> Self {
        self.component_options = options;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(content: &str) -> NamingResult<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| NamingError::Configuration(format!("Invalid JSON configuration: {}", e)))?;
        config.validate().map_err(NamingError::Configuration)?;
        Ok(config)
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(content: &str) -> NamingResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| NamingError::Configuration(format!("Invalid YAML configuration: {}", e)))?;
        config.validate().map_err(NamingError::Configuration)?;
        Ok(config)
    }

    /// Load from a storage backend; `.yaml`/`.yml` files are YAML, anything else JSON
    pub async fn load(storage: &dyn StorageBackend, path: &str) -> NamingResult<Self> {
        let bytes = storage.read_file(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| {
            NamingError::Configuration(format!("Configuration {} is not UTF-8: {}", path, e))
        })?;

        let config = if path.ends_with(".yaml") || path.ends_with(".yml") {
            Self::from_yaml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        info!(
            path,
            components = config.components.len(),
            resource_types = config.resource_types.len(),
            strategy = %config.settings.conflict_resolution.strategy,
            "Loaded naming configuration"
        );
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let mut component_keys = HashSet::new();
        for component in &self.components {
            if component.name.trim().is_empty() {
                return Err("Component name cannot be empty".to_string());
            }
            if component.min_length > component.max_length {
                return Err(format!(
                    "Component {} has minLength {} greater than maxLength {}",
                    component.name, component.min_length, component.max_length
                ));
            }
            if !component_keys.insert(component.key()) {
                return Err(format!("Duplicate component: {}", component.name));
            }
        }

        let mut short_names = HashSet::new();
        for resource_type in &self.resource_types {
            if resource_type.short_name.trim().is_empty() {
                return Err(format!(
                    "Resource type {} has no short name",
                    resource_type.resource
                ));
            }
            if !short_names.insert(resource_type.short_name.to_lowercase()) {
                return Err(format!(
                    "Duplicate resource type short name: {}",
                    resource_type.short_name
                ));
            }
            if resource_type.regex.trim().is_empty() {
                warn!(
                    resource_type = %resource_type.short_name,
                    "Resource type has no regex, names for it will fail validation"
                );
            }
        }

        self.settings.conflict_resolution.validate()
    }
}
