//! Generate command implementation

use resource_naming_sdk::{NamingService, ResourceNameRequest};

use super::component_values;
use crate::error::CliError;
use crate::output::print_json;

/// Arguments for the `generate` command
pub struct GenerateArgs {
    pub resource_type: String,
    pub components: Vec<(String, String)>,
    pub user: Option<String>,
}

/// Handle the generate command; returns whether a name was generated
pub async fn handle_generate(
    service: &NamingService,
    args: GenerateArgs,
) -> Result<bool, CliError> {
    let request = ResourceNameRequest {
        resource_type: args.resource_type,
        components: component_values(&args.components),
        created_by: args.user.unwrap_or_default(),
    };

    let response = service.generate(request).await;
    print_json(&response)?;
    Ok(response.success)
}
