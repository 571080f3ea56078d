//! Resource type model

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::component::component_key;
use super::default_true;
use super::short_name::HasShortName;

/// Length bounds are stored as text, configuration files use both `"3"` and `3`
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Naming rules of a target resource kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDefinition {
    /// Provider path or display name, e.g. `Compute/virtualMachines`
    #[serde(default)]
    pub resource: String,
    pub short_name: String,
    #[serde(default)]
    pub optional_components: BTreeSet<String>,
    #[serde(default)]
    pub excluded_components: BTreeSet<String>,
    #[serde(default)]
    pub regex: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub length_min: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub length_max: String,
    #[serde(default)]
    pub invalid_characters: String,
    #[serde(default)]
    pub invalid_characters_start: String,
    #[serde(default)]
    pub invalid_characters_end: String,
    #[serde(default)]
    pub invalid_characters_consecutive: String,
    #[serde(default = "default_true")]
    pub apply_delimiter: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ResourceTypeDefinition {
    pub fn new(short_name: impl Into<String>, regex: impl Into<String>) -> Self {
        let short_name = short_name.into();
        Self {
            resource: short_name.clone(),
            short_name,
            optional_components: BTreeSet::new(),
            excluded_components: BTreeSet::new(),
            regex: regex.into(),
            length_min: String::new(),
            length_max: String::new(),
            invalid_characters: String::new(),
            invalid_characters_start: String::new(),
            invalid_characters_end: String::new(),
            invalid_characters_consecutive: String::new(),
            apply_delimiter: true,
            enabled: true,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn with_lengths(mut self, min: usize, max: usize) -> Self {
        self.length_min = min.to_string();
        self.length_max = max.to_string();
        self
    }

    pub fn with_optional<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_components
            .extend(components.into_iter().map(Into::into));
        self
    }

    pub fn with_excluded<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_components
            .extend(components.into_iter().map(Into::into));
        self
    }

    pub fn with_invalid_characters(mut self, anywhere: &str, start: &str, end: &str) -> Self {
        self.invalid_characters = anywhere.to_string();
        self.invalid_characters_start = start.to_string();
        self.invalid_characters_end = end.to_string();
        self
    }

    pub fn with_invalid_consecutive(mut self, characters: &str) -> Self {
        self.invalid_characters_consecutive = characters.to_string();
        self
    }

    pub fn with_apply_delimiter(mut self, apply: bool) -> Self {
        self.apply_delimiter = apply;
        self
    }

    /// Whether the component may be left out when no value is supplied
    pub fn is_optional(&self, key: &str) -> bool {
        self.optional_components
            .iter()
            .any(|name| component_key(name) == key)
    }

    /// Whether the component never takes part in names of this type
    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_components
            .iter()
            .any(|name| component_key(name) == key)
    }

    pub fn min_length(&self) -> Option<usize> {
        self.length_min.trim().parse().ok()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.length_max.trim().parse().ok()
    }

    /// Display label used in ledger records
    pub fn label(&self) -> &str {
        if self.resource.is_empty() {
            &self.short_name
        } else {
            &self.resource
        }
    }
}

impl HasShortName for ResourceTypeDefinition {
    fn short_name(&self) -> &str {
        &self.short_name
    }

    fn set_short_name(&mut self, value: String) {
        self.short_name = value;
    }
}
