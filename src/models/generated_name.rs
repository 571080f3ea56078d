//! Generated name ledger record and transient validation metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted generated name. Never mutated after it enters the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNameRecord {
    pub id: i64,
    pub created_on: DateTime<Utc>,
    pub resource_name: String,
    pub resource_type_name: String,
    /// Ordered `[component, value]` pairs the name was built from
    #[serde(default)]
    pub components: Vec<[String; 2]>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub message: String,
}

/// A record waiting for its ledger Id
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedNameDraft {
    pub resource_name: String,
    pub resource_type_name: String,
    pub components: Vec<[String; 2]>,
    pub user: String,
    pub message: String,
}

impl GeneratedNameDraft {
    pub fn new(resource_name: impl Into<String>, resource_type_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            resource_type_name: resource_type_name.into(),
            components: Vec::new(),
            user: "General".to_string(),
            message: String::new(),
        }
    }

    pub fn into_record(self, id: i64, created_on: DateTime<Utc>) -> GeneratedNameRecord {
        GeneratedNameRecord {
            id,
            created_on,
            resource_name: self.resource_name,
            resource_type_name: self.resource_type_name,
            components: self.components,
            user: self.user,
            message: self.message,
        }
    }
}

/// Outcome of the existence check, attached to responses only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AzureValidationMetadata {
    pub validation_performed: bool,
    pub exists_in_azure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    pub increment_attempts: u32,
    #[serde(default)]
    pub conflicting_resources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_warning: Option<String>,
    pub validation_timestamp: DateTime<Utc>,
}
