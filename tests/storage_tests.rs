//! Storage and configuration loading tests

use std::sync::Arc;

use resource_naming_sdk::models::GeneratedNameDraft;
use resource_naming_sdk::{
    ConflictStrategy, DEFAULT_LEDGER_PATH, FileSystemStorageBackend, GeneratedNameLedger,
    NamingConfiguration, NamingService, ResourceNameRequest, ShortNameCase, StorageBackend,
};
use tempfile::TempDir;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

const CONFIG_YAML: &str = r#"
delimiter: "-"
components:
  - name: ResourceType
    sortOrder: 1
  - name: ResourceEnvironment
    sortOrder: 2
  - name: ResourceLocation
    sortOrder: 3
  - name: ResourceInstance
    sortOrder: 4
componentOptions:
  - component: ResourceLocation
    name: West Europe
    shortName: WEU
resourceTypes:
  - resource: Compute/virtualMachines
    shortName: VM
    regex: "^[a-z0-9-]+$"
    lengthMin: 1
    lengthMax: "15"
settings:
  existenceCheckEnabled: true
  shortNameCase: lower
  conflictResolution:
    strategy: AutoIncrement
    incrementPadding: 3
"#;

mod ledger_file_tests {
    use super::*;

    #[test]
    fn test_ledger_survives_reload() {
        runtime().block_on(async {
            let dir = TempDir::new().unwrap();
            let storage = Arc::new(FileSystemStorageBackend::new(dir.path()));

            let ledger = GeneratedNameLedger::load(storage.clone(), DEFAULT_LEDGER_PATH)
                .await
                .unwrap();
            ledger
                .append(GeneratedNameDraft::new("rg-prd-eus", "rg"))
                .await
                .unwrap();
            ledger
                .append(GeneratedNameDraft::new("vm-prd-eus-001", "vm"))
                .await
                .unwrap();

            let bytes = storage.read_file(DEFAULT_LEDGER_PATH).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            let entries = json.as_array().unwrap();
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0]["id"], 1);
            assert_eq!(entries[1]["resourceName"], "vm-prd-eus-001");

            let reloaded = GeneratedNameLedger::load(storage, DEFAULT_LEDGER_PATH)
                .await
                .unwrap();
            assert!(reloaded.contains_name("RG-PRD-EUS").await);
            let next = reloaded
                .append(GeneratedNameDraft::new("kv-prd-eus", "kv"))
                .await
                .unwrap();
            assert_eq!(next.id, 3);
        });
    }

    #[test]
    fn test_empty_ledger_file() {
        runtime().block_on(async {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join(DEFAULT_LEDGER_PATH), "  \n").unwrap();
            let storage = Arc::new(FileSystemStorageBackend::new(dir.path()));

            let ledger = GeneratedNameLedger::load(storage, DEFAULT_LEDGER_PATH)
                .await
                .unwrap();
            assert!(ledger.is_empty().await);
        });
    }
}

mod configuration_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_yaml_configuration() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("naming.yaml"), CONFIG_YAML).unwrap();
        let storage = FileSystemStorageBackend::new(dir.path());

        let config = NamingConfiguration::load(&storage, "naming.yaml").await.unwrap();
        assert_eq!(config.components.len(), 4);
        assert_eq!(config.settings.short_name_case, ShortNameCase::Lower);
        assert_eq!(
            config.settings.conflict_resolution.strategy,
            ConflictStrategy::AutoIncrement
        );
        assert_eq!(config.resource_types[0].max_length(), Some(15));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let yaml = CONFIG_YAML.replace("AutoIncrement", "Sometimes");
        assert!(NamingConfiguration::from_yaml_str(&yaml).is_err());
    }

    #[tokio::test]
    async fn test_generate_from_yaml_configuration() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("naming.yaml"), CONFIG_YAML).unwrap();
        let storage = Arc::new(FileSystemStorageBackend::new(dir.path()));

        let config = NamingConfiguration::load(storage.as_ref(), "naming.yaml")
            .await
            .unwrap();
        let ledger = GeneratedNameLedger::load(storage.clone(), DEFAULT_LEDGER_PATH)
            .await
            .unwrap();
        let service = NamingService::new(&config, Arc::new(ledger));

        let request: ResourceNameRequest = serde_json::from_str(
            r#"{
                "resourceType": "vm",
                "resourceEnvironment": "prd",
                "resourceLocation": "West Europe",
                "resourceInstance": "1"
            }"#,
        )
        .unwrap();

        let first = service.generate(request.clone()).await;
        assert!(first.success, "{}", first.message);
        assert_eq!(first.resource_name, "vm-prd-weu-1");

        let second = service.generate(request).await;
        assert_eq!(second.resource_name, "vm-prd-weu-002");
        assert_eq!(second.validation_metadata.unwrap().increment_attempts, 1);

        assert!(storage.file_exists(DEFAULT_LEDGER_PATH).await.unwrap());
    }
}

mod concurrency_tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_auto_increment_records_unique_names() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileSystemStorageBackend::new(dir.path()));
        let config = NamingConfiguration::from_yaml_str(CONFIG_YAML).unwrap();
        let ledger = GeneratedNameLedger::load(storage.clone(), DEFAULT_LEDGER_PATH)
            .await
            .unwrap();
        let service = Arc::new(NamingService::new(&config, Arc::new(ledger)));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let request: ResourceNameRequest = serde_json::from_str(
                    r#"{
                        "resourceType": "vm",
                        "resourceEnvironment": "prd",
                        "resourceLocation": "weu",
                        "resourceInstance": "001"
                    }"#,
                )
                .unwrap();
                service.generate(request).await
            }));
        }

        let mut names = Vec::new();
        for handle in handles {
            let response = handle.await.unwrap();
            assert!(response.success, "{}", response.message);
            names.push(response.resource_name);
        }

        let unique: HashSet<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(unique.len(), 16, "duplicate names recorded: {names:?}");
        assert!(unique.contains("vm-prd-weu-001"));
        assert!(unique.contains("vm-prd-weu-016"));

        let reloaded = GeneratedNameLedger::load(storage, DEFAULT_LEDGER_PATH)
            .await
            .unwrap();
        assert_eq!(reloaded.len().await, 16);
    }
}
