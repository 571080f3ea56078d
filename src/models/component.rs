//! Naming component models

use serde::{Deserialize, Serialize};

use super::default_true;
use super::short_name::HasShortName;

fn default_min_length() -> usize {
    1
}

fn default_max_length() -> usize {
    10
}

/// Normalise a component name into the key used by requests and resource type rules.
///
/// Lowercases, removes whitespace and drops a leading `resource` prefix, so
/// `ResourceEnvironment`, `resourceEnvironment` and `environment` share one key.
pub fn component_key(name: &str) -> String {
    let compact: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    match compact.strip_prefix("resource") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => compact,
    }
}

/// A configured naming segment (environment, location, instance, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub sort_order: i32,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub is_free_text: bool,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Generate a random value when the request supplies none
    #[serde(default)]
    pub enforce_random: bool,
    /// Random values may contain digits; `false` restricts them to letters
    #[serde(default = "default_true")]
    pub alphanumeric: bool,
    #[serde(default = "default_true")]
    pub apply_delimiter_before: bool,
    #[serde(default = "default_true")]
    pub apply_delimiter_after: bool,
}

impl ComponentDefinition {
    pub fn new(name: impl Into<String>, sort_order: i32) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            enabled: true,
            sort_order,
            is_custom: false,
            is_free_text: false,
            min_length: default_min_length(),
            max_length: default_max_length(),
            enforce_random: false,
            alphanumeric: true,
            apply_delimiter_before: true,
            apply_delimiter_after: true,
        }
    }

    /// Normalised lookup key of this component
    pub fn key(&self) -> String {
        component_key(&self.name)
    }

    /// Label written into ledger records
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_length(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Generate random values of the configured length when no value is supplied
    pub fn with_random(mut self, alphanumeric: bool) -> Self {
        self.enforce_random = true;
        self.alphanumeric = alphanumeric;
        self
    }

    pub fn with_free_text(mut self) -> Self {
        self.is_free_text = true;
        self
    }

    pub fn with_custom(mut self) -> Self {
        self.is_custom = true;
        self
    }

    pub fn with_delimiters(mut self, before: bool, after: bool) -> Self {
        self.apply_delimiter_before = before;
        self.apply_delimiter_after = after;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A selectable value of a component, e.g. location `East US` with short name `eus`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOption {
    #[serde(default)]
    pub id: i64,
    /// Name of the component this option belongs to
    pub component: String,
    pub name: String,
    pub short_name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ComponentOption {
    pub fn new(
        component: impl Into<String>,
        name: impl Into<String>,
        short_name: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            component: component.into(),
            name: name.into(),
            short_name: short_name.into(),
            enabled: true,
        }
    }
}

impl HasShortName for ComponentOption {
    fn short_name(&self) -> &str {
        &self.short_name
    }

    fn set_short_name(&mut self, value: String) {
        self.short_name = value;
    }
}
