//! Component value validation.
//!
//! Supplied values become part of a resource name, so they are checked before
//! assembly: free text values must respect the component bounds and no value may
//! carry whitespace or control characters.

use thiserror::Error;

use crate::models::ComponentDefinition;

/// Errors that can occur while validating a supplied component value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComponentValueError {
    /// Value shorter than the component minimum
    #[error("{component} must be at least {min} characters (got {actual})")]
    TooShort {
        component: String,
        min: usize,
        actual: usize,
    },

    /// Value longer than the component maximum
    #[error("{component} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        component: String,
        max: usize,
        actual: usize,
    },

    /// Value contains characters that cannot appear in a name
    #[error("{component} contains invalid characters: {reason}")]
    InvalidCharacters { component: String, reason: String },
}

/// Validate a value supplied for `component`.
///
/// # Examples
///
/// ```
/// use resource_naming_sdk::models::ComponentDefinition;
/// use resource_naming_sdk::validation::validate_component_value;
///
/// let app = ComponentDefinition::new("App", 3).with_free_text().with_length(2, 5);
/// assert!(validate_component_value(&app, "web").is_ok());
/// assert!(validate_component_value(&app, "w").is_err());
/// assert!(validate_component_value(&app, "web app").is_err());
/// ```
pub fn validate_component_value(
    component: &ComponentDefinition,
    value: &str,
) -> Result<(), ComponentValueError> {
    if let Some(c) = value.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(ComponentValueError::InvalidCharacters {
            component: component.label().to_string(),
            reason: format!("invalid character: {:?}", c),
        });
    }

    if component.is_free_text {
        let actual = value.chars().count();
        if actual < component.min_length {
            return Err(ComponentValueError::TooShort {
                component: component.label().to_string(),
                min: component.min_length,
                actual,
            });
        }
        if actual > component.max_length {
            return Err(ComponentValueError::TooLong {
                component: component.label().to_string(),
                max: component.max_length,
                actual,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_only_apply_to_free_text() {
        let location = ComponentDefinition::new("ResourceLocation", 2).with_length(1, 3);
        assert!(validate_component_value(&location, "westeurope").is_ok());

        let free = ComponentDefinition::new("Project", 2)
            .with_free_text()
            .with_length(1, 3);
        assert!(matches!(
            validate_component_value(&free, "westeurope"),
            Err(ComponentValueError::TooLong { max: 3, actual: 10, .. })
        ));
    }

    #[test]
    fn test_control_characters_rejected() {
        let env = ComponentDefinition::new("ResourceEnvironment", 1);
        assert!(matches!(
            validate_component_value(&env, "prd\n"),
            Err(ComponentValueError::InvalidCharacters { .. })
        ));
    }
}
