//! Parsing of the derive input into the pieces code generation needs.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod config_derive;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes, VariantAttributes};
pub(crate) use config_derive::{ConfigDerive, ConfigEnum, ConfigMeta, ConfigStruct, StructField};
