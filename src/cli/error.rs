//! Error types for the naming CLI

use std::path::PathBuf;

use resource_naming_sdk::NamingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("{0}")]
    Naming(#[from] NamingError),

    #[error("Failed to write output: {0}")]
    OutputError(String),
}

impl CliError {
    /// Message printed to stderr
    pub fn user_message(&self) -> String {
        match self {
            CliError::Naming(err) => err.user_message(),
            CliError::FileReadError(path, reason) => format!(
                "Failed to read {}: {}\n\nHint: Check the --config path.",
                path.display(),
                reason
            ),
            _ => self.to_string(),
        }
    }
}
