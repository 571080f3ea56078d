//! Error types for naming operations
//!
//! Errors follow the naming pipeline stages. Configuration and validation errors are
//! final for a single request, conflict errors depend on the selected strategy, and
//! external service errors are normally absorbed into warnings before they reach the
//! caller.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur while generating, validating or persisting a name
#[derive(Error, Debug)]
pub enum NamingError {
    /// Missing or unusable configuration (unknown component, empty regex, bad settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The candidate name breaks a resource type rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// The name collides with an existing name and the strategy refuses to resolve it
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// Existence oracle failed or timed out
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Ledger write failed, the name is not reserved
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// JSON/YAML (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Anything the pipeline did not anticipate
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for naming operations
pub type NamingResult<T> = Result<T, NamingError>;

impl NamingError {
    /// Short machine-friendly kind, used in logs and admin log entries
    pub fn kind(&self) -> &'static str {
        match self {
            NamingError::Configuration(_) => "configuration",
            NamingError::Validation(_) => "validation",
            NamingError::Conflict(_) => "conflict",
            NamingError::ExternalService(_) => "external_service",
            NamingError::Persistence(_) => "persistence",
            NamingError::Serialization(_) => "serialization",
            NamingError::Internal(_) => "internal",
        }
    }

    /// Whether the error was unexpected and must be reported to the admin log
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            NamingError::Internal(_) | NamingError::Persistence(_) | NamingError::Serialization(_)
        )
    }

    /// Message returned to API callers.
    ///
    /// Validation and conflict messages are surfaced verbatim, unexpected errors are
    /// replaced with a generic text.
    pub fn response_message(&self) -> String {
        match self {
            NamingError::Validation(msg) | NamingError::Conflict(msg) => msg.clone(),
            NamingError::Configuration(msg) => msg.clone(),
            NamingError::ExternalService(msg) => msg.clone(),
            NamingError::Persistence(_) => {
                "The generated name could not be saved. The name is not reserved.".to_string()
            }
            NamingError::Serialization(_) | NamingError::Internal(_) => {
                "There was a problem generating the name.".to_string()
            }
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            NamingError::Configuration(msg) => {
                format!(
                    "Invalid configuration: {msg}\n\nHint: Check the naming configuration file."
                )
            }
            NamingError::Conflict(msg) => {
                format!(
                    "{msg}\n\nHint: Choose a different instance value or switch the conflict \
                    resolution strategy."
                )
            }
            NamingError::Persistence(err) => {
                format!(
                    "Failed to save the generated name: {err}\n\n\
                    Hint: Check that the ledger directory is writable."
                )
            }
            _ => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for NamingError {
    fn from(err: serde_json::Error) -> Self {
        NamingError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for NamingError {
    fn from(err: serde_yaml::Error) -> Self {
        NamingError::Serialization(err.to_string())
    }
}
