//! Name assembly
//!
//! Turns component values into a raw candidate name for a resource type.

pub mod assembler;

pub use assembler::{AssembledName, INSTANCE_KEY, NameAssembler, random_value};
