//! CLI command handlers

pub mod bulk;
pub mod generate;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use resource_naming_sdk::models::component_key;
use resource_naming_sdk::{
    ComponentValues, ConflictStrategy, DEFAULT_LEDGER_PATH, FileSystemStorageBackend,
    GeneratedNameLedger, NamingConfiguration, NamingService, ShortNameCase,
};

use crate::error::CliError;

/// Parse a `key=value` argument
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("Invalid key=value pair: {}", s))?;
    Ok((s[..pos].trim().to_string(), s[pos + 1..].trim().to_string()))
}

/// Map `--component` pairs onto request fields; unknown keys become custom components
pub fn component_values(pairs: &[(String, String)]) -> ComponentValues {
    let mut values = ComponentValues::default();
    for (name, value) in pairs {
        let value = value.clone();
        match component_key(name).as_str() {
            "environment" => values.resource_environment = value,
            "function" => values.resource_function = value,
            "instance" => values.resource_instance = value,
            "location" => values.resource_location = value,
            "org" => values.resource_org = value,
            "projappsvc" => values.resource_proj_app_svc = value,
            "unitdept" => values.resource_unit_dept = value,
            _ => {
                values.custom_components.insert(name.clone(), value);
            }
        }
    }
    values
}

/// Command line overrides of configured settings
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsOverrides {
    pub strategy: Option<ConflictStrategy>,
    pub short_name_case: Option<ShortNameCase>,
}

impl SettingsOverrides {
    pub fn apply(&self, configuration: &mut NamingConfiguration) {
        if let Some(strategy) = self.strategy {
            configuration.settings.conflict_resolution.strategy = strategy;
        }
        if let Some(case) = self.short_name_case {
            configuration.settings.short_name_case = case;
        }
    }
}

/// Load the configuration, apply overrides and open the ledger in `ledger_dir`
pub async fn build_service(
    config: &Path,
    ledger_dir: &Path,
    overrides: SettingsOverrides,
) -> Result<NamingService, CliError> {
    let file_name = config
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            CliError::InvalidArgument(format!("Invalid configuration path: {}", config.display()))
        })?;
    let config_dir = config
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let config_storage = FileSystemStorageBackend::new(config_dir);
    let mut configuration = NamingConfiguration::load(&config_storage, file_name)
        .await
        .map_err(|e| match e {
            resource_naming_sdk::NamingError::Persistence(err) => {
                CliError::FileReadError(config.to_path_buf(), err.to_string())
            }
            other => CliError::Naming(other),
        })?;
    overrides.apply(&mut configuration);

    let ledger_storage = Arc::new(FileSystemStorageBackend::new(ledger_dir));
    let ledger = GeneratedNameLedger::load(ledger_storage, DEFAULT_LEDGER_PATH).await?;

    Ok(NamingService::new(&configuration, Arc::new(ledger)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_values_mapping() {
        let pairs = vec![
            ("env".to_string(), "prd".to_string()),
            ("ResourceLocation".to_string(), "eus".to_string()),
            ("App Tier".to_string(), "web".to_string()),
        ];
        let values = component_values(&pairs);
        assert_eq!(values.resource_location, "eus");
        assert_eq!(values.custom_components.get("env").map(String::as_str), Some("prd"));
        assert_eq!(values.custom_components.get("App Tier").map(String::as_str), Some("web"));
    }

    #[test]
    fn test_settings_overrides() {
        let mut configuration = NamingConfiguration::new(Vec::new(), Vec::new());
        SettingsOverrides::default().apply(&mut configuration);
        assert_eq!(
            configuration.settings.conflict_resolution.strategy,
            ConflictStrategy::NotifyOnly
        );

        let overrides = SettingsOverrides {
            strategy: Some("auto-increment".parse().unwrap()),
            short_name_case: Some("UPPER".parse().unwrap()),
        };
        overrides.apply(&mut configuration);
        assert_eq!(
            configuration.settings.conflict_resolution.strategy,
            ConflictStrategy::AutoIncrement
        );
        assert_eq!(configuration.settings.short_name_case, ShortNameCase::Upper);
        assert!("sometimes".parse::<ConflictStrategy>().is_err());
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("location = eus").unwrap(),
            ("location".to_string(), "eus".to_string())
        );
        assert!(parse_key_val("location").is_err());
    }
}
