//! Name assembler
//!
//! Components are emitted in sort order. A delimiter sits between two neighbouring
//! segments only when the resource type applies delimiters, the left segment allows
//! one after it and the right segment allows one before it, so the assembled name
//! never starts or ends with a delimiter.

use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{NamingError, NamingResult};
use crate::models::{ComponentDefinition, NameRequest};
use crate::validation::validate_component_value;

/// Component key whose value is the resource type short name
pub const RESOURCE_TYPE_KEY: &str = "type";

/// Component key substituted by auto-increment conflict resolution
pub const INSTANCE_KEY: &str = "instance";

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Raw candidate plus the ordered component values it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledName {
    pub name: String,
    pub components: Vec<[String; 2]>,
    /// Emitted values by component key, random ones included
    pub values: BTreeMap<String, String>,
}

struct Segment<'a> {
    component: &'a ComponentDefinition,
    key: String,
    value: String,
}

/// Random lowercase value of `length` characters
pub fn random_value<R: Rng + ?Sized>(rng: &mut R, length: usize, alphanumeric: bool) -> String {
    let charset = if alphanumeric { ALPHANUMERIC } else { LETTERS };
    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Assembles names from the enabled components of a catalog
#[derive(Debug, Clone)]
pub struct NameAssembler {
    components: Vec<ComponentDefinition>,
}

impl NameAssembler {
    /// Keep enabled components, ordered by sort order
    pub fn new(components: impl IntoIterator<Item = ComponentDefinition>) -> Self {
        let mut components: Vec<ComponentDefinition> =
            components.into_iter().filter(|c| c.enabled).collect();
        components.sort_by_key(|c| c.sort_order);
        Self { components }
    }

    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    /// Whether names of this request's resource type contain the component
    pub fn includes(&self, request: &NameRequest, key: &str) -> bool {
        self.components.iter().any(|c| c.key() == key)
            && !request.resource_type.is_excluded(key)
    }

    /// Assemble using the thread-local random source
    pub fn assemble(&self, request: &NameRequest) -> NamingResult<AssembledName> {
        self.assemble_with_rng(request, &mut rand::thread_rng())
    }

    /// Assemble with an explicit random source for `EnforceRandom` components
    pub fn assemble_with_rng<R: Rng + ?Sized>(
        &self,
        request: &NameRequest,
        rng: &mut R,
    ) -> NamingResult<AssembledName> {
        let resource_type = &request.resource_type;
        let mut segments: Vec<Segment<'_>> = Vec::with_capacity(self.components.len());

        for component in &self.components {
            let key = component.key();
            if resource_type.is_excluded(&key) {
                continue;
            }

            let supplied = if key == RESOURCE_TYPE_KEY {
                Some(resource_type.short_name.as_str()).filter(|v| !v.is_empty())
            } else {
                request.value(&key)
            };

            let value = match supplied {
                Some(value) => {
                    validate_component_value(component, value)
                        .map_err(|e| NamingError::Validation(e.to_string()))?;
                    value.to_string()
                }
                None if component.enforce_random => {
                    let low = component.min_length.min(component.max_length).max(1);
                    let high = component.max_length.max(low);
                    let length = rng.gen_range(low..=high);
                    random_value(rng, length, component.alphanumeric)
                }
                None if resource_type.is_optional(&key) => continue,
                None => {
                    return Err(NamingError::Configuration(format!(
                        "A value is required for component {} of resource type {}",
                        component.label(),
                        resource_type.short_name
                    )));
                }
            };

            segments.push(Segment {
                component,
                key,
                value,
            });
        }

        let delimit = resource_type.apply_delimiter && !request.delimiter.is_empty();
        let mut name = String::new();
        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                let previous = segments[index - 1].component;
                if delimit
                    && previous.apply_delimiter_after
                    && segment.component.apply_delimiter_before
                {
                    name.push_str(&request.delimiter);
                }
            }
            name.push_str(&segment.value);
        }

        let components = segments
            .iter()
            .map(|s| [s.component.label().to_string(), s.value.clone()])
            .collect();
        let values = segments
            .iter()
            .map(|s| (s.key.clone(), s.value.clone()))
            .collect();

        debug!(resource_type = %resource_type.short_name, resource_name = %name, "Assembled name");
        Ok(AssembledName {
            name,
            components,
            values,
        })
    }
}
