//! Entity schema module
//!
//! Describes the fields of a record type so that filter and ordering
//! directives can be checked against real fields and their raw values
//! parsed into typed predicates.

mod types;

pub use types::{is_valid_identifier, EntitySchema, FieldDef, FieldType};

#[cfg(test)]
mod tests;
