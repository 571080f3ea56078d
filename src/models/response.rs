//! Response types returned by the naming service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::generated_name::{AzureValidationMetadata, GeneratedNameRecord};

/// Result of a single name generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNameResponse {
    pub success: bool,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name_details: Option<GeneratedNameRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_metadata: Option<AzureValidationMetadata>,
}

impl ResourceNameResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            resource_name: String::new(),
            message: message.into(),
            resource_name_details: None,
            validation_metadata: None,
        }
    }

    /// HTTP status for REST adapters
    pub fn status_code(&self) -> u16 {
        if self.success { 200 } else { 400 }
    }
}

/// Result of a validate-only request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateNameResponse {
    pub valid: bool,
    pub name: String,
    pub message: String,
}

/// One entry of a bulk response, in request order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkResourceNameResult {
    pub resource_type: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name_details: Option<GeneratedNameRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_metadata: Option<AzureValidationMetadata>,
}

impl BulkResourceNameResult {
    pub fn from_response(resource_type: &str, response: ResourceNameResponse) -> Self {
        if response.success {
            Self {
                resource_type: resource_type.to_string(),
                success: true,
                resource_name: Some(response.resource_name),
                error_message: None,
                resource_name_details: response.resource_name_details,
                validation_metadata: response.validation_metadata,
            }
        } else {
            Self {
                resource_type: resource_type.to_string(),
                success: false,
                resource_name: None,
                error_message: Some(response.message),
                resource_name_details: None,
                validation_metadata: response.validation_metadata,
            }
        }
    }

    pub fn failure(resource_type: &str, message: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            success: false,
            resource_name: None,
            error_message: Some(message.into()),
            resource_name_details: None,
            validation_metadata: None,
        }
    }
}

/// Aggregated bulk outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkResourceNameResponse {
    pub results: Vec<BulkResourceNameResult>,
    pub success: bool,
    pub message: String,
    pub total_requested: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub processed_at: DateTime<Utc>,
}

impl BulkResourceNameResponse {
    /// Summarise processed results; `total_requested` counts entries that were never
    /// processed because the batch stopped early
    pub fn from_results(results: Vec<BulkResourceNameResult>, total_requested: usize) -> Self {
        let success_count = results.iter().filter(|r| r.success).count();
        let failure_count = results.len() - success_count;
        let skipped = total_requested.saturating_sub(results.len());

        let mut message = format!(
            "Generated {} of {} resource names",
            success_count, total_requested
        );
        if failure_count > 0 {
            message.push_str(&format!(", {} failed", failure_count));
        }
        if skipped > 0 {
            message.push_str(&format!(", {} not processed", skipped));
        }

        Self {
            success: failure_count == 0 && !results.is_empty(),
            results,
            message,
            total_requested,
            success_count,
            failure_count,
            processed_at: Utc::now(),
        }
    }

    /// Rejected before any item ran
    pub fn rejected(message: impl Into<String>, total_requested: usize) -> Self {
        Self {
            results: Vec::new(),
            success: false,
            message: message.into(),
            total_requested,
            success_count: 0,
            failure_count: 0,
            processed_at: Utc::now(),
        }
    }

    pub fn is_partial_success(&self) -> bool {
        self.success_count > 0 && self.failure_count > 0
    }

    /// 200 when everything succeeded, 207 on partial success, 400 otherwise
    pub fn status_code(&self) -> u16 {
        if self.success {
            200
        } else if self.is_partial_success() {
            207
        } else {
            400
        }
    }
}
