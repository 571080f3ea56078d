//! Conflict resolution
//!
//! Runs after a candidate has been validated. The resolver asks the existence checker
//! whether the candidate is taken and, depending on the configured strategy, keeps it,
//! rejects it, increments its instance number or appends a random suffix. Existence
//! checker failures and timeouts never abort resolution; they are carried as warnings.

pub mod instance;

pub use instance::{InstanceRebuilder, InstanceSegment};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{ConflictResolutionSettings, ConflictStrategy};
use crate::existence::{DEFAULT_REMOTE_TIMEOUT, ExistenceChecker, ExistenceReport};
use crate::models::ResourceTypeDefinition;
use crate::naming::random_value;
use crate::validation::NameValidator;

/// Outcome of conflict resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    /// Candidate as it entered resolution
    pub original_name: String,
    /// Name to use; absent when the strategy rejected the candidate
    pub final_name: Option<String>,
    pub attempts: u32,
    /// Instance value of the returned name when auto-increment rebuilt it
    pub instance: Option<String>,
    pub warning: Option<String>,
    pub error_message: Option<String>,
    /// The returned name may still conflict
    pub unresolved: bool,
    pub exists_remotely: bool,
    pub conflicting_resources: Vec<String>,
    /// First existence checker failure seen during resolution
    pub remote_warning: Option<String>,
}

impl ResolutionResult {
    fn new(original_name: &str) -> Self {
        Self {
            original_name: original_name.to_string(),
            final_name: Some(original_name.to_string()),
            ..Default::default()
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.error_message.is_some()
    }

    /// Whether the final name differs from the original candidate
    pub fn was_modified(&self) -> bool {
        self.final_name
            .as_deref()
            .is_some_and(|name| name != self.original_name)
    }

    /// Warning and checker failure text combined
    pub fn warnings(&self) -> Option<String> {
        match (&self.warning, &self.remote_warning) {
            (Some(w), Some(r)) => Some(format!("{w}\n{r}")),
            (Some(w), None) => Some(w.clone()),
            (None, Some(r)) => Some(r.clone()),
            (None, None) => None,
        }
    }
}

/// Applies the configured conflict strategy to validated candidates
pub struct ConflictResolver {
    checker: Arc<dyn ExistenceChecker>,
    validator: Arc<NameValidator>,
    settings: ConflictResolutionSettings,
    timeout: Duration,
}

impl ConflictResolver {
    pub fn new(
        checker: Arc<dyn ExistenceChecker>,
        validator: Arc<NameValidator>,
        settings: ConflictResolutionSettings,
    ) -> Self {
        Self {
            checker,
            validator,
            settings,
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Time allowed for each existence check
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settings(&self) -> &ConflictResolutionSettings {
        &self.settings
    }

    async fn check(
        &self,
        candidate: &str,
        resource_type: &str,
        result: &mut ResolutionResult,
    ) -> ExistenceReport {
        let outcome =
            tokio::time::timeout(self.timeout, self.checker.exists(candidate, resource_type)).await;

        let failure = match outcome {
            Ok(Ok(report)) => {
                if let Some(warning) = &report.warning
                    && result.remote_warning.is_none()
                {
                    result.remote_warning = Some(warning.clone());
                }
                return report;
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "Existence check timed out after {} ms",
                self.timeout.as_millis()
            ),
        };

        warn!(
            candidate,
            resource_type,
            error = %failure,
            "Existence check failed, assuming no conflict"
        );
        if result.remote_warning.is_none() {
            result.remote_warning = Some(format!(
                "Remote name validation could not be completed: {}",
                failure
            ));
        }
        ExistenceReport::default()
    }

    /// Resolve `candidate` for `resource_type`.
    ///
    /// `rebuilder` rebuilds the name around a new instance value for auto-increment;
    /// without one the trailing number of the candidate is incremented, or a number
    /// is appended when there is none.
    pub async fn resolve(
        &self,
        candidate: &str,
        resource_type: &ResourceTypeDefinition,
        delimiter: &str,
        rebuilder: Option<&dyn InstanceRebuilder>,
    ) -> ResolutionResult {
        let mut result = ResolutionResult::new(candidate);
        let short_name = resource_type.short_name.as_str();

        let report = self.check(candidate, short_name, &mut result).await;
        result.exists_remotely = report.exists_remotely;
        result.conflicting_resources = report.conflicting_ids.clone();

        if !report.exists() {
            return result;
        }

        let strategy = self.settings.strategy;
        info!(
            candidate,
            resource_type = short_name,
            strategy = %strategy,
            "Name conflict detected"
        );

        match strategy {
            ConflictStrategy::NotifyOnly => {
                result.unresolved = true;
                if self.settings.include_warnings {
                    result.warning = Some(format!("The name '{}' already exists", candidate));
                }
            }
            ConflictStrategy::Fail => {
                result.final_name = None;
                result.error_message = Some(format!(
                    "The name '{}' already exists and the conflict strategy is Fail",
                    candidate
                ));
            }
            ConflictStrategy::AutoIncrement => {
                let padding = self.settings.increment_padding;
                match rebuilder {
                    Some(rebuilder) => {
                        let segment =
                            InstanceSegment::parse(rebuilder.current_instance(), padding, "");
                        self.retry(&mut result, resource_type, delimiter, |attempt| {
                            let instance = segment.next(u64::from(attempt));
                            let name = rebuilder.rebuild(&instance).ok()?;
                            Some((name, Some(instance)))
                        })
                        .await;
                    }
                    None => {
                        let segment = InstanceSegment::parse(candidate, padding, delimiter);
                        self.retry(&mut result, resource_type, delimiter, |attempt| {
                            Some((segment.next(u64::from(attempt)), None))
                        })
                        .await;
                    }
                }
            }
            ConflictStrategy::SuffixRandom => {
                let length = self.settings.random_suffix_length.max(1);
                self.retry(&mut result, resource_type, delimiter, |_| {
                    let suffix = random_value(&mut rand::thread_rng(), length, true);
                    Some((format!("{candidate}{delimiter}{suffix}"), None))
                })
                .await;
            }
        }

        result
    }

    async fn retry<F>(
        &self,
        result: &mut ResolutionResult,
        resource_type: &ResourceTypeDefinition,
        delimiter: &str,
        mut next_candidate: F,
    ) where
        F: FnMut(u32) -> Option<(String, Option<String>)>,
    {
        let short_name = resource_type.short_name.as_str();
        let mut last_candidate = result.original_name.clone();
        let mut last_instance = None;

        for attempt in 1..=self.settings.max_attempts {
            result.attempts = attempt;

            let Some((raw, instance)) = next_candidate(attempt) else {
                debug!(attempt, resource_type = short_name, "Could not rebuild candidate");
                continue;
            };

            let validation = self.validator.validate(resource_type, &raw, delimiter);
            if !validation.valid {
                debug!(attempt, candidate = %raw, "Rebuilt candidate failed validation");
                continue;
            }
            last_candidate = validation.name;
            last_instance = instance;

            let report = self.check(&last_candidate, short_name, result).await;
            if !report.exists() {
                info!(
                    attempt,
                    resource_type = short_name,
                    resource_name = %last_candidate,
                    "Conflict resolved"
                );
                result.final_name = Some(last_candidate);
                result.instance = last_instance;
                return;
            }
        }

        warn!(
            attempts = result.attempts,
            resource_type = short_name,
            strategy = %self.settings.strategy,
            "Conflict resolution exhausted"
        );
        result.unresolved = true;
        if self.settings.include_warnings {
            let label = match self.settings.strategy {
                ConflictStrategy::SuffixRandom => "Random suffix resolution",
                _ => "Auto-increment",
            };
            result.warning = Some(format!(
                "{} exhausted after {} attempts; the name '{}' may conflict \
                with an existing resource",
                label, result.attempts, last_candidate
            ));
        }
        result.final_name = Some(last_candidate);
        result.instance = last_instance;
    }
}
