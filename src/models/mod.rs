//! Models module for the SDK
//!
//! Defines the configuration entities consumed by the naming pipeline, the ledger
//! record, and the request/response shapes exchanged with callers.

pub mod component;
pub mod generated_name;
pub mod request;
pub mod resource_type;
pub mod response;
pub mod short_name;

pub use component::{ComponentDefinition, ComponentOption, component_key};
pub use generated_name::{AzureValidationMetadata, GeneratedNameDraft, GeneratedNameRecord};
pub use request::{
    BulkResourceNameRequest, ComponentValues, NameRequest, ResourceNameRequest,
    ValidateNameRequest,
};
pub use resource_type::ResourceTypeDefinition;
pub use response::{
    BulkResourceNameResponse, BulkResourceNameResult, ResourceNameResponse,
    ValidateNameResponse,
};
pub use short_name::{HasShortName, ShortNameCase, apply_short_name_case};

pub(crate) fn default_true() -> bool {
    true
}
