//! Validate command implementation

use resource_naming_sdk::{NamingService, ValidateNameRequest};

use crate::error::CliError;
use crate::output::print_json;

/// Handle the validate command; returns whether the name is valid
pub async fn handle_validate(
    service: &NamingService,
    resource_type: &str,
    name: &str,
) -> Result<bool, CliError> {
    let response = service
        .validate_name(ValidateNameRequest {
            resource_type: resource_type.to_string(),
            name: name.to_string(),
        })
        .await?;

    print_json(&response)?;
    Ok(response.valid)
}
