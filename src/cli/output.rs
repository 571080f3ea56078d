//! Output formatting for CLI

use serde::Serialize;

use crate::error::CliError;

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| CliError::OutputError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
