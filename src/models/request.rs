//! Request types accepted by the naming service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::component::component_key;
use super::default_true;
use super::resource_type::ResourceTypeDefinition;

/// Component values shared by single and bulk requests
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentValues {
    #[serde(default)]
    pub resource_environment: String,
    #[serde(default)]
    pub resource_function: String,
    #[serde(default)]
    pub resource_instance: String,
    #[serde(default)]
    pub resource_location: String,
    #[serde(default)]
    pub resource_org: String,
    #[serde(default)]
    pub resource_proj_app_svc: String,
    #[serde(default)]
    pub resource_unit_dept: String,
    /// Values of custom components keyed by component name
    #[serde(default)]
    pub custom_components: BTreeMap<String, String>,
}

impl ComponentValues {
    /// Non-empty values keyed by normalised component key
    pub fn to_value_map(&self) -> BTreeMap<String, String> {
        let fixed = [
            ("environment", &self.resource_environment),
            ("function", &self.resource_function),
            ("instance", &self.resource_instance),
            ("location", &self.resource_location),
            ("org", &self.resource_org),
            ("projappsvc", &self.resource_proj_app_svc),
            ("unitdept", &self.resource_unit_dept),
        ];

        let mut values: BTreeMap<String, String> = fixed
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.to_string(), value.trim().to_string()))
            .collect();

        for (name, value) in &self.custom_components {
            if !value.trim().is_empty() {
                values.insert(component_key(name), value.trim().to_string());
            }
        }
        values
    }

    /// Overlay `overrides` on these values; non-empty override fields win
    pub fn merged_with(&self, overrides: &ComponentValues) -> ComponentValues {
        fn pick(base: &str, over: &str) -> String {
            if over.trim().is_empty() {
                base.to_string()
            } else {
                over.to_string()
            }
        }

        let mut custom_components = self.custom_components.clone();
        for (name, value) in &overrides.custom_components {
            if !value.trim().is_empty() {
                custom_components.insert(name.clone(), value.clone());
            }
        }

        ComponentValues {
            resource_environment: pick(&self.resource_environment, &overrides.resource_environment),
            resource_function: pick(&self.resource_function, &overrides.resource_function),
            resource_instance: pick(&self.resource_instance, &overrides.resource_instance),
            resource_location: pick(&self.resource_location, &overrides.resource_location),
            resource_org: pick(&self.resource_org, &overrides.resource_org),
            resource_proj_app_svc: pick(
                &self.resource_proj_app_svc,
                &overrides.resource_proj_app_svc,
            ),
            resource_unit_dept: pick(&self.resource_unit_dept, &overrides.resource_unit_dept),
            custom_components,
        }
    }
}

/// Request to generate a single name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNameRequest {
    /// Short name of the target resource type
    pub resource_type: String,
    #[serde(flatten)]
    pub components: ComponentValues,
    #[serde(default)]
    pub created_by: String,
}

/// Request to validate an existing name against a resource type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateNameRequest {
    pub resource_type: String,
    pub name: String,
}

/// Request to generate names for several resource types at once
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkResourceNameRequest {
    pub resource_types: Vec<String>,
    #[serde(flatten)]
    pub components: ComponentValues,
    /// Per resource type values layered over the shared ones
    #[serde(default)]
    pub resource_type_overrides: BTreeMap<String, ComponentValues>,
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
    #[serde(default)]
    pub validate_only: bool,
    #[serde(default)]
    pub created_by: String,
}

impl Default for BulkResourceNameRequest {
    fn default() -> Self {
        Self {
            resource_types: Vec::new(),
            components: ComponentValues::default(),
            resource_type_overrides: BTreeMap::new(),
            continue_on_error: true,
            validate_only: false,
            created_by: String::new(),
        }
    }
}

impl BulkResourceNameRequest {
    /// Build the single-name request for one entry of the batch
    pub fn item_request(&self, resource_type: &str) -> ResourceNameRequest {
        let components = match self.resource_type_overrides.get(resource_type) {
            Some(overrides) => self.components.merged_with(overrides),
            None => self.components.clone(),
        };
        ResourceNameRequest {
            resource_type: resource_type.to_string(),
            components,
            created_by: self.created_by.clone(),
        }
    }
}

/// Input of the name assembler: resolved values for one resource type
#[derive(Debug, Clone)]
pub struct NameRequest {
    pub values: BTreeMap<String, String>,
    pub resource_type: ResourceTypeDefinition,
    pub delimiter: String,
}

impl NameRequest {
    pub fn new(resource_type: ResourceTypeDefinition, delimiter: impl Into<String>) -> Self {
        Self {
            values: BTreeMap::new(),
            resource_type,
            delimiter: delimiter.into(),
        }
    }

    /// Set a value; the component name is normalised
    pub fn with_value(mut self, component: &str, value: impl Into<String>) -> Self {
        self.values.insert(component_key(component), value.into());
        self
    }

    /// Supplied value for a component key, empty values count as missing
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request_wire_shape() {
        let json = r#"{
            "resourceType": "vm",
            "resourceEnvironment": "prd",
            "resourceLocation": "eus",
            "resourceInstance": "001",
            "customComponents": {"App Tier": "web"},
            "createdBy": "alice"
        }"#;
        let request: ResourceNameRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.resource_type, "vm");
        assert_eq!(request.created_by, "alice");

        let values = request.components.to_value_map();
        assert_eq!(values.get("environment").map(String::as_str), Some("prd"));
        assert_eq!(values.get("apptier").map(String::as_str), Some("web"));
        assert!(!values.contains_key("org"));
    }

    #[test]
    fn test_bulk_defaults_and_overrides() {
        let json = r#"{
            "resourceTypes": ["rg", "vm"],
            "resourceEnvironment": "dev",
            "resourceLocation": "eus",
            "resourceTypeOverrides": {"vm": {"resourceEnvironment": "prd"}}
        }"#;
        let request: BulkResourceNameRequest = serde_json::from_str(json).unwrap();
        assert!(request.continue_on_error);
        assert!(!request.validate_only);

        let rg = request.item_request("rg");
        let vm = request.item_request("vm");
        assert_eq!(rg.components.resource_environment, "dev");
        assert_eq!(vm.components.resource_environment, "prd");
        assert_eq!(vm.components.resource_location, "eus");
    }

    #[test]
    fn test_empty_override_keeps_shared_value() {
        let shared = ComponentValues {
            resource_org: "mkt".to_string(),
            ..Default::default()
        };
        let overrides = ComponentValues {
            resource_org: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(shared.merged_with(&overrides).resource_org, "mkt");
    }
}
