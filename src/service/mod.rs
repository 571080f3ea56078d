//! Naming service
//!
//! Orchestrates single, validate-only and bulk requests:
//! assemble, validate, resolve conflicts (when existence checks are enabled), then
//! record the name in the ledger. Only successful generations are recorded. The
//! existence check and the append run under the ledger reservation, so concurrent
//! requests never record the same name twice.
//! Unexpected failures are reported to the admin log and answered with a generic
//! message.

mod bulk;

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::admin_log::{AdminLog, AdminLogEntry, TracingAdminLog};
use crate::catalog::{CachedCatalog, CatalogSnapshot, ComponentCatalog, StaticCatalog};
use crate::config::{NamingConfiguration, NamingSettings};
use crate::error::{NamingError, NamingResult};
use crate::existence::{ExistenceChecker, LedgerExistenceChecker};
use crate::ledger::GeneratedNameLedger;
use crate::models::{
    AzureValidationMetadata, ComponentValues, GeneratedNameDraft, NameRequest,
    ResourceNameRequest, ResourceNameResponse, ResourceTypeDefinition, ValidateNameRequest,
    ValidateNameResponse, component_key,
};
use crate::naming::{AssembledName, INSTANCE_KEY, NameAssembler};
use crate::resolution::{ConflictResolver, InstanceRebuilder, ResolutionResult};
use crate::validation::{NameValidator, ValidationResult};

const GENERATED_MESSAGE: &str = "Resource name generated successfully";

/// Assembled and validated candidate for one resource type
struct PreparedName {
    resource_type: ResourceTypeDefinition,
    assembler: NameAssembler,
    request: NameRequest,
    assembled: AssembledName,
    validation: ValidationResult,
}

impl PreparedName {
    /// Rebuilder substituting the instance component, when names of this type have one
    fn instance_rebuilder(&self) -> Option<AssemblerInstance<'_>> {
        if !self.assembler.includes(&self.request, INSTANCE_KEY) {
            return None;
        }

        let mut request = self.request.clone();
        request.values = self.assembled.values.clone();
        let current = request.value(INSTANCE_KEY).unwrap_or_default().to_string();
        Some(AssemblerInstance {
            assembler: &self.assembler,
            request,
            current,
        })
    }
}

/// Re-runs the assembler with frozen component values and a new instance
struct AssemblerInstance<'a> {
    assembler: &'a NameAssembler,
    request: NameRequest,
    current: String,
}

impl AssemblerInstance<'_> {
    fn assemble(&self, instance: &str) -> NamingResult<AssembledName> {
        let mut request = self.request.clone();
        request
            .values
            .insert(INSTANCE_KEY.to_string(), instance.to_string());
        self.assembler.assemble(&request)
    }
}

impl InstanceRebuilder for AssemblerInstance<'_> {
    fn current_instance(&self) -> &str {
        &self.current
    }

    fn rebuild(&self, instance: &str) -> NamingResult<String> {
        Ok(self.assemble(instance)?.name)
    }
}

fn join_messages<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resource naming service
pub struct NamingService {
    catalog: Arc<dyn ComponentCatalog>,
    ledger: Arc<GeneratedNameLedger>,
    checker: Arc<dyn ExistenceChecker>,
    validator: Arc<NameValidator>,
    settings: NamingSettings,
    delimiter: String,
    admin_log: Arc<dyn AdminLog>,
}

impl NamingService {
    /// Service over a cached static catalog built from `config`, checking existence
    /// against `ledger`
    pub fn new(config: &NamingConfiguration, ledger: Arc<GeneratedNameLedger>) -> Self {
        let checker = LedgerExistenceChecker::new(ledger.clone())
            .with_remote_timeout(config.settings.existence_check_timeout());
        let catalog = CachedCatalog::new(
            Arc::new(StaticCatalog::from_configuration(config)),
            config.settings.catalog_cache_ttl(),
        );

        Self {
            catalog: Arc::new(catalog),
            ledger,
            checker: Arc::new(checker),
            validator: Arc::new(NameValidator::new()),
            settings: config.settings.clone(),
            delimiter: config.delimiter.clone(),
            admin_log: Arc::new(TracingAdminLog),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn ComponentCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Use `catalog` behind a cache with the configured time-to-live
    pub fn with_cached_catalog(self, catalog: Arc<dyn ComponentCatalog>) -> Self {
        let ttl = self.settings.catalog_cache_ttl();
        self.with_catalog(Arc::new(CachedCatalog::new(catalog, ttl)))
    }

    /// Drop the cached catalog snapshot; the next request reloads it
    pub fn invalidate_catalog(&self) {
        self.catalog.invalidate();
        debug!("Catalog snapshot invalidated");
    }

    pub fn with_existence_checker(mut self, checker: Arc<dyn ExistenceChecker>) -> Self {
        self.checker = checker;
        self
    }

    pub fn with_admin_log(mut self, admin_log: Arc<dyn AdminLog>) -> Self {
        self.admin_log = admin_log;
        self
    }

    pub fn ledger(&self) -> &Arc<GeneratedNameLedger> {
        &self.ledger
    }

    pub fn settings(&self) -> &NamingSettings {
        &self.settings
    }

    fn resolver(&self) -> ConflictResolver {
        ConflictResolver::new(
            self.checker.clone(),
            self.validator.clone(),
            self.settings.conflict_resolution.clone(),
        )
        .with_timeout(self.settings.existence_check_timeout())
    }

    /// Log unexpected errors to the admin log and produce the caller facing message
    async fn report_failure(
        &self,
        err: &NamingError,
        operation: &str,
        resource_type: &str,
    ) -> String {
        if err.is_unexpected() {
            self.admin_log
                .record(
                    AdminLogEntry::new(err.kind(), operation, err.to_string())
                        .with_resource_type(resource_type),
                )
                .await;
        } else {
            debug!(operation, resource_type, kind = err.kind(), error = %err, "Request failed");
        }
        err.response_message()
    }

    /// Generate, resolve and record one name
    pub async fn generate(&self, request: ResourceNameRequest) -> ResourceNameResponse {
        match self.try_generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                let message = self
                    .report_failure(&e, "generate", &request.resource_type)
                    .await;
                ResourceNameResponse::failure(message)
            }
        }
    }

    /// Validate a caller supplied name against a resource type
    pub async fn validate_name(
        &self,
        request: ValidateNameRequest,
    ) -> NamingResult<ValidateNameResponse> {
        let snapshot = self.catalog.snapshot().await?;
        let resource_type = Self::lookup_resource_type(&snapshot, &request.resource_type)?;
        let result = self
            .validator
            .validate(resource_type, &request.name, &self.delimiter);

        Ok(ValidateNameResponse {
            valid: result.valid,
            name: result.name,
            message: result.message,
        })
    }

    fn lookup_resource_type<'a>(
        snapshot: &'a CatalogSnapshot,
        short_name: &str,
    ) -> NamingResult<&'a ResourceTypeDefinition> {
        snapshot.resource_type(short_name).ok_or_else(|| {
            NamingError::Configuration(format!(
                "Resource type {} is not configured or is disabled",
                short_name
            ))
        })
    }

    /// Resolve request values to component keys, translating option names to short names
    fn name_request(
        &self,
        snapshot: &CatalogSnapshot,
        resource_type: &ResourceTypeDefinition,
        components: &ComponentValues,
    ) -> NamingResult<NameRequest> {
        for (name, value) in &components.custom_components {
            if value.trim().is_empty() {
                continue;
            }
            match snapshot.component(&component_key(name)) {
                Some(component) if component.is_custom => {}
                _ => {
                    return Err(NamingError::Configuration(format!(
                        "Unknown custom component: {}",
                        name
                    )));
                }
            }
        }

        let mut request = NameRequest::new(resource_type.clone(), self.delimiter.clone());
        for (key, value) in components.to_value_map() {
            let value = snapshot
                .option_short_name(&key, &value)
                .map(str::to_string)
                .unwrap_or(value);
            request.values.insert(key, value);
        }
        Ok(request)
    }

    /// Assemble and validate; an invalid candidate is a validation error
    async fn prepare(&self, request: &ResourceNameRequest) -> NamingResult<PreparedName> {
        let snapshot = self.catalog.snapshot().await?;
        let resource_type = Self::lookup_resource_type(&snapshot, &request.resource_type)?.clone();
        let name_request = self.name_request(&snapshot, &resource_type, &request.components)?;

        let assembler = NameAssembler::new(snapshot.components.iter().cloned());
        let assembled = assembler.assemble(&name_request)?;
        let validation = self
            .validator
            .validate(&resource_type, &assembled.name, &self.delimiter);

        if !validation.valid {
            info!(
                resource_type = %resource_type.short_name,
                candidate = %assembled.name,
                "Generated name failed validation"
            );
            return Err(NamingError::Validation(validation.message));
        }

        Ok(PreparedName {
            resource_type,
            assembler,
            request: name_request,
            assembled,
            validation,
        })
    }

    fn validation_metadata(resolution: &ResolutionResult) -> AzureValidationMetadata {
        AzureValidationMetadata {
            validation_performed: true,
            exists_in_azure: resolution.exists_remotely,
            original_name: resolution
                .was_modified()
                .then(|| resolution.original_name.clone()),
            increment_attempts: resolution.attempts,
            conflicting_resources: resolution.conflicting_resources.clone(),
            validation_warning: resolution.warnings(),
            validation_timestamp: Utc::now(),
        }
    }

    async fn try_generate(
        &self,
        request: &ResourceNameRequest,
    ) -> NamingResult<ResourceNameResponse> {
        let prepared = self.prepare(request).await?;
        let short_name = prepared.resource_type.short_name.clone();

        // Held until the name is recorded
        let _reservation = self.ledger.reserve().await;

        let mut resource_name = prepared.validation.name.clone();
        let mut components = prepared.assembled.components.clone();
        let mut metadata = None;
        let mut warning = None;

        if self.settings.existence_check_enabled {
            let rebuilder = prepared.instance_rebuilder();
            let resolution = self
                .resolver()
                .resolve(
                    &resource_name,
                    &prepared.resource_type,
                    &self.delimiter,
                    rebuilder.as_ref().map(|r| r as &dyn InstanceRebuilder),
                )
                .await;

            if let Some(error_message) = &resolution.error_message {
                return Err(NamingError::Conflict(error_message.clone()));
            }
            if let (Some(rebuilder), Some(instance)) = (&rebuilder, &resolution.instance) {
                components = rebuilder.assemble(instance)?.components;
            }
            if let Some(final_name) = &resolution.final_name {
                resource_name = final_name.clone();
            }
            warning = resolution.warnings();
            metadata = Some(Self::validation_metadata(&resolution));
        }

        let message = join_messages([
            GENERATED_MESSAGE,
            prepared.validation.message.as_str(),
            warning.as_deref().unwrap_or_default(),
        ]);

        let mut draft =
            GeneratedNameDraft::new(resource_name.clone(), prepared.resource_type.label());
        draft.components = components;
        draft.message = message.clone();
        if !request.created_by.trim().is_empty() {
            draft.user = request.created_by.trim().to_string();
        }

        let record = match self.ledger.append(draft).await {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    resource_type = %short_name,
                    resource_name = %resource_name,
                    "Generated name was not recorded"
                );
                return Err(e);
            }
        };

        info!(
            id = record.id,
            resource_type = %short_name,
            resource_name = %resource_name,
            "Generated resource name"
        );
        Ok(ResourceNameResponse {
            success: true,
            resource_name,
            message,
            resource_name_details: Some(record),
            validation_metadata: metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin_log::MemoryAdminLog;
    use crate::config::{ConflictResolutionSettings, ConflictStrategy};
    use crate::models::{ComponentDefinition, ComponentOption};
    use crate::storage::MemoryStorageBackend;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn configuration(strategy: ConflictStrategy) -> NamingConfiguration {
        NamingConfiguration::new(
            vec![
                ComponentDefinition::new("ResourceType", 1),
                ComponentDefinition::new("ResourceLocation", 2),
                ComponentDefinition::new("ResourceInstance", 3),
                ComponentDefinition::new("App Tier", 4).with_custom(),
            ],
            vec![
                ResourceTypeDefinition::new("vm", "^[a-z0-9-]+$")
                    .with_resource("Compute/virtualMachines")
                    .with_lengths(1, 15)
                    .with_optional(["App Tier"]),
            ],
        )
        .with_options(vec![ComponentOption::new("ResourceLocation", "East US", "eus")])
        .with_settings(
            NamingSettings::new()
                .with_existence_check(true)
                .with_conflict_resolution(ConflictResolutionSettings::new(strategy)),
        )
    }

    fn vm_request(location: &str, instance: &str) -> ResourceNameRequest {
        ResourceNameRequest {
            resource_type: "vm".to_string(),
            components: ComponentValues {
                resource_location: location.to_string(),
                resource_instance: instance.to_string(),
                ..Default::default()
            },
            created_by: "alice".to_string(),
        }
    }

    fn service(strategy: ConflictStrategy) -> NamingService {
        NamingService::new(
            &configuration(strategy),
            Arc::new(GeneratedNameLedger::in_memory()),
        )
    }

    #[tokio::test]
    async fn test_generate_records_name() {
        let service = service(ConflictStrategy::NotifyOnly);
        let response = service.generate(vm_request("East US", "001")).await;

        assert!(response.success, "{}", response.message);
        assert_eq!(response.resource_name, "vm-eus-001");
        let details = response.resource_name_details.unwrap();
        assert_eq!(details.id, 1);
        assert_eq!(details.user, "alice");
        assert_eq!(details.resource_type_name, "Compute/virtualMachines");
        assert_eq!(details.components[1], ["ResourceLocation".to_string(), "eus".to_string()]);
        assert!(response.validation_metadata.unwrap().validation_performed);
    }

    #[tokio::test]
    async fn test_auto_increment_rebuilds_instance() {
        let service = service(ConflictStrategy::AutoIncrement);
        service.generate(vm_request("eus", "001")).await;
        service.generate(vm_request("eus", "002")).await;

        let response = service.generate(vm_request("eus", "001")).await;
        assert_eq!(response.resource_name, "vm-eus-003");
        let metadata = response.validation_metadata.unwrap();
        assert_eq!(metadata.increment_attempts, 2);
        assert_eq!(metadata.original_name.as_deref(), Some("vm-eus-001"));
        let details = response.resource_name_details.unwrap();
        assert_eq!(details.components[2][1], "003");
    }

    #[tokio::test]
    async fn test_fail_strategy_records_nothing() {
        let service = service(ConflictStrategy::Fail);
        assert!(service.generate(vm_request("eus", "001")).await.success);

        let response = service.generate(vm_request("eus", "001")).await;
        assert!(!response.success);
        assert!(response.message.contains("already exists"));
        assert_eq!(service.ledger().len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_type_and_custom_component() {
        let service = service(ConflictStrategy::NotifyOnly);
        let mut request = vm_request("eus", "001");
        request.resource_type = "kv".to_string();
        let response = service.generate(request).await;
        assert!(!response.success);
        assert!(response.message.contains("kv"));

        let mut request = vm_request("eus", "001");
        request
            .components
            .custom_components
            .insert("Cost Centre".to_string(), "fin".to_string());
        let response = service.generate(request).await;
        assert!(response.message.contains("Unknown custom component"));

        let mut request = vm_request("eus", "001");
        request
            .components
            .custom_components
            .insert("App Tier".to_string(), "web".to_string());
        let response = service.generate(request).await;
        assert_eq!(response.resource_name, "vm-eus-001-web");
    }

    #[tokio::test]
    async fn test_persistence_failure_goes_to_admin_log() {
        let storage = Arc::new(MemoryStorageBackend::new());
        let ledger = GeneratedNameLedger::load(storage.clone(), "names.json")
            .await
            .unwrap();
        let ledger = Arc::new(ledger);
        storage.set_read_only(true);

        let admin_log = Arc::new(MemoryAdminLog::new());
        let service = NamingService::new(&configuration(ConflictStrategy::NotifyOnly), ledger)
            .with_admin_log(admin_log.clone());

        let response = service.generate(vm_request("eus", "001")).await;
        assert!(!response.success);
        assert!(response.message.contains("not reserved"));
        assert_eq!(admin_log.entries()[0].kind, "persistence");
    }

    #[tokio::test]
    async fn test_validate_name() {
        let service = service(ConflictStrategy::NotifyOnly);
        let response = service
            .validate_name(ValidateNameRequest {
                resource_type: "VM".to_string(),
                name: "VM-EUS-001".to_string(),
            })
            .await
            .unwrap();
        assert!(response.valid);
        assert_eq!(response.name, "vm-eus-001");

        let err = service
            .validate_name(ValidateNameRequest {
                resource_type: "kv".to_string(),
                name: "kv-1".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, NamingError::Configuration(_)));
    }

    struct CountingCatalog {
        snapshot: Arc<CatalogSnapshot>,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl ComponentCatalog for CountingCatalog {
        async fn snapshot(&self) -> NamingResult<Arc<CatalogSnapshot>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.snapshot.clone())
        }
    }

    #[tokio::test]
    async fn test_catalog_snapshot_is_cached_until_invalidated() {
        let config = configuration(ConflictStrategy::NotifyOnly);
        let inner = Arc::new(CountingCatalog {
            snapshot: StaticCatalog::from_configuration(&config).snapshot().await.unwrap(),
            loads: AtomicUsize::new(0),
        });
        let service = NamingService::new(&config, Arc::new(GeneratedNameLedger::in_memory()))
            .with_cached_catalog(inner.clone());

        assert!(service.generate(vm_request("eus", "001")).await.success);
        assert!(service.generate(vm_request("eus", "002")).await.success);
        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);

        service.invalidate_catalog();
        assert!(service.generate(vm_request("eus", "003")).await.success);
        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }
}
