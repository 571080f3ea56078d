//! Validation functionality
//!
//! Provides validation logic for:
//! - Generated names against resource type rules (regex, length, characters)
//! - Supplied component values (free text bounds, unsafe characters)

pub mod component;
pub mod name;

pub use component::{ComponentValueError, validate_component_value};
pub use name::{NameValidator, ValidationResult};
