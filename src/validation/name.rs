//! Name validation against resource type rules.
//!
//! Every check runs, failures accumulate. Fixes that the rules allow (lowercasing,
//! removing the delimiter) are applied to the returned name and reported as
//! informational messages without clearing `valid`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use crate::models::ResourceTypeDefinition;

pub const REGEX_NOT_CONFIGURED: &str = "Regex pattern is not configured";

/// Outcome of validating one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Candidate after lowercasing and delimiter removal
    pub name: String,
    /// Newline separated diagnostics, empty when nothing happened
    pub message: String,
}

impl ValidationResult {
    fn rejected(name: &str, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Validates candidates, memoising compiled patterns per regex string
#[derive(Debug, Default)]
pub struct NameValidator {
    patterns: RwLock<HashMap<String, Regex>>,
}

impl NameValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn pattern(&self, source: &str) -> Result<Regex, regex::Error> {
        if let Ok(patterns) = self.patterns.read()
            && let Some(pattern) = patterns.get(source)
        {
            return Ok(pattern.clone());
        }

        let compiled = Regex::new(source)?;
        if let Ok(mut patterns) = self.patterns.write() {
            patterns.insert(source.to_string(), compiled.clone());
        }
        Ok(compiled)
    }

    /// Validate `name` for `resource_type`.
    ///
    /// `delimiter` may be empty; when set it is the first thing sacrificed to satisfy
    /// the pattern or the maximum length.
    pub fn validate(
        &self,
        resource_type: &ResourceTypeDefinition,
        name: &str,
        delimiter: &str,
    ) -> ValidationResult {
        if resource_type.regex.trim().is_empty() {
            return ValidationResult::rejected(name, REGEX_NOT_CONFIGURED);
        }

        let pattern = match self.pattern(&resource_type.regex) {
            Ok(pattern) => pattern,
            Err(e) => {
                return ValidationResult::rejected(
                    name,
                    format!("Regex pattern is invalid: {}", e),
                );
            }
        };

        let short_name = &resource_type.short_name;
        let mut name = name.to_string();
        let mut valid = true;
        let mut messages: Vec<String> = Vec::new();

        if !resource_type.regex.contains("A-Z") {
            let lowered = name.to_lowercase();
            if lowered != name {
                messages.push(format!(
                    "Resource type {} only allows lowercase characters. \
                    The name was converted to lowercase.",
                    short_name
                ));
                name = lowered;
            }
        }

        if !pattern.is_match(&name) {
            let stripped = (!delimiter.is_empty())
                .then(|| name.replace(delimiter, ""))
                .filter(|stripped| pattern.is_match(stripped));

            match stripped {
                Some(stripped) => {
                    messages.push(format!(
                        "The delimiter '{}' was removed to match the naming pattern \
                        of resource type {}.",
                        delimiter, short_name
                    ));
                    name = stripped;
                }
                None => {
                    messages.push(format!(
                        "Regex failed - the name does not match the pattern {} \
                        of resource type {}.",
                        resource_type.regex, short_name
                    ));
                    valid = false;
                }
            }
        }

        if let Some(min) = resource_type.min_length()
            && name.chars().count() < min
        {
            messages.push(format!(
                "Generated name is shorter than the minimum length ({}) of resource type {}.",
                min, short_name
            ));
            valid = false;
        }

        if let Some(max) = resource_type.max_length()
            && name.chars().count() > max
        {
            let stripped = if delimiter.is_empty() {
                name.clone()
            } else {
                name.replace(delimiter, "")
            };

            if stripped.chars().count() > max {
                messages.push(format!(
                    "Generated name exceeds maximum length ({}) of resource type {}. \
                    Shorten one or more component values.",
                    max, short_name
                ));
                valid = false;
            } else {
                messages.push(format!(
                    "The delimiter '{}' was removed to stay within the maximum length ({}) \
                    of resource type {}.",
                    delimiter, max, short_name
                ));
                name = stripped;
            }
        }

        for c in resource_type.invalid_characters.chars() {
            if name.contains(c) {
                messages.push(format!("Name cannot contain the following character: {}", c));
                valid = false;
            }
        }

        for c in resource_type.invalid_characters_start.chars() {
            if name.starts_with(c) {
                messages.push(format!("Name cannot start with the following character: {}", c));
                valid = false;
            }
        }

        for c in resource_type.invalid_characters_end.chars() {
            if name.ends_with(c) {
                messages.push(format!("Name cannot end with the following character: {}", c));
                valid = false;
            }
        }

        let chars: Vec<char> = name.chars().collect();
        for c in resource_type.invalid_characters_consecutive.chars() {
            if chars.windows(2).any(|pair| pair[0] == c && pair[1] == c) {
                messages.push(format!(
                    "Name cannot contain the following consecutive character: {}",
                    c
                ));
                valid = false;
            }
        }

        debug!(resource_type = %short_name, resource_name = %name, valid, "Validated name");

        ValidationResult {
            valid,
            name,
            message: messages.join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_account() -> ResourceTypeDefinition {
        ResourceTypeDefinition::new("st", "^[a-z0-9]+$").with_lengths(3, 24)
    }

    #[test]
    fn test_empty_regex_stops_validation() {
        let resource_type = ResourceTypeDefinition::new("vm", "")
            .with_invalid_characters("!", "", "");
        let result = NameValidator::new().validate(&resource_type, "Bad!", "-");
        assert!(!result.valid);
        assert_eq!(result.message, REGEX_NOT_CONFIGURED);
        assert_eq!(result.name, "Bad!");
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let resource_type = ResourceTypeDefinition::new("vm", "^[a-z+$");
        let result = NameValidator::new().validate(&resource_type, "vm", "");
        assert!(!result.valid);
        assert!(result.message.starts_with("Regex pattern is invalid"));
    }

    #[test]
    fn test_lowercase_only_type_lowercases() {
        let result = NameValidator::new().validate(&storage_account(), "StData01", "");
        assert!(result.valid);
        assert_eq!(result.name, "stdata01");
        assert!(result.message.contains("lowercase"));
    }

    #[test]
    fn test_mixed_case_type_keeps_case() {
        let resource_type = ResourceTypeDefinition::new("vm", "^[a-zA-Z0-9-]+$");
        let result = NameValidator::new().validate(&resource_type, "VM-Prd-01", "-");
        assert!(result.valid);
        assert_eq!(result.name, "VM-Prd-01");
        assert!(result.message.is_empty());
    }

    #[test]
    fn test_delimiter_stripping_fallback() {
        let resource_type = ResourceTypeDefinition::new("st", "^[a-z0-9]+$");
        let result = NameValidator::new().validate(&resource_type, "test-resource", "-");
        assert!(result.valid);
        assert_eq!(result.name, "testresource");
        assert!(result.message.contains("delimiter"));
    }

    #[test]
    fn test_regex_failure_without_delimiter() {
        let resource_type = ResourceTypeDefinition::new("st", "^[a-z0-9]+$");
        let result = NameValidator::new().validate(&resource_type, "test-resource", "");
        assert!(!result.valid);
        assert_eq!(result.name, "test-resource");
        assert!(result.message.contains("Regex failed"));
    }

    #[test]
    fn test_minimum_length() {
        let result = NameValidator::new().validate(&storage_account(), "ab", "");
        assert!(!result.valid);
        assert!(result.message.contains("minimum length (3)"));
    }

    #[test]
    fn test_max_length_boundary() {
        let resource_type = ResourceTypeDefinition::new("vm", "^[a-z0-9-]+$").with_lengths(1, 12);
        let result = NameValidator::new().validate(&resource_type, "test-name-01", "-");
        assert!(result.valid);
        assert_eq!(result.name, "test-name-01");
        assert!(result.message.is_empty());
    }

    #[test]
    fn test_max_length_recovered_by_stripping_delimiter() {
        let resource_type = ResourceTypeDefinition::new("vm", "^[a-z0-9-]+$").with_lengths(1, 10);
        let result = NameValidator::new().validate(&resource_type, "test-name-01", "-");
        assert!(result.valid);
        assert_eq!(result.name, "testname01");
        assert!(result.message.contains("maximum length (10)"));
    }

    #[test]
    fn test_max_length_exceeded() {
        let resource_type = ResourceTypeDefinition::new("vm", "^[a-z0-9-]+$").with_lengths(1, 8);
        let result = NameValidator::new().validate(&resource_type, "test-name-01", "-");
        assert!(!result.valid);
        assert!(result.message.contains("exceeds maximum length"));
        assert_eq!(result.name, "test-name-01");
    }

    #[test]
    fn test_character_rules_accumulate() {
        let resource_type = ResourceTypeDefinition::new("kv", "^[a-z0-9_.-]+$")
            .with_invalid_characters("_.", "-", "-")
            .with_invalid_consecutive("-");
        let result = NameValidator::new().validate(&resource_type, "-a_b.c--d-", "");
        assert!(!result.valid);

        let lines: Vec<&str> = result.message.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Name cannot contain the following character: _",
                "Name cannot contain the following character: .",
                "Name cannot start with the following character: -",
                "Name cannot end with the following character: -",
                "Name cannot contain the following consecutive character: -",
            ]
        );
    }

    #[test]
    fn test_consecutive_rule() {
        let resource_type =
            ResourceTypeDefinition::new("vm", "^[a-z0-9-]+$").with_invalid_consecutive("-");
        let result = NameValidator::new().validate(&resource_type, "a--b", "");
        assert!(!result.valid);
        assert!(result.message.contains('-'));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let validator = NameValidator::new();
        let resource_type = storage_account().with_invalid_consecutive("0");
        let first = validator.validate(&resource_type, "Data-Store-001", "-");
        let second = validator.validate(&resource_type, "Data-Store-001", "-");
        assert_eq!(first, second);
    }
}
