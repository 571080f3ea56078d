//! Bulk command implementation

use resource_naming_sdk::{BulkResourceNameRequest, NamingService};

use super::component_values;
use crate::error::CliError;
use crate::output::print_json;

/// Arguments for the `bulk` command
pub struct BulkArgs {
    pub resource_types: Vec<String>,
    pub components: Vec<(String, String)>,
    pub stop_on_error: bool,
    pub validate_only: bool,
    pub user: Option<String>,
}

/// Handle the bulk command; returns whether every item succeeded
pub async fn handle_bulk(service: &NamingService, args: BulkArgs) -> Result<bool, CliError> {
    let resource_types: Vec<String> = args
        .resource_types
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if resource_types.is_empty() {
        return Err(CliError::InvalidArgument(
            "--types needs at least one resource type".to_string(),
        ));
    }

    let request = BulkResourceNameRequest {
        resource_types,
        components: component_values(&args.components),
        continue_on_error: !args.stop_on_error,
        validate_only: args.validate_only,
        created_by: args.user.unwrap_or_default(),
        ..Default::default()
    };

    let response = service.generate_bulk(request).await;
    print_json(&response)?;
    Ok(response.success)
}
