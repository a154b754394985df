//! Schema types

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Valid field and table identifiers: `likeCount`, `created_at`, `_id`
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Check that a name can be used as a field or table identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// Storage type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Float,
    Text,
    Boolean,
    Timestamp,
}

impl FieldType {
    /// Whether substring matching (`like`, `i_like`) applies to this type
    pub fn is_textual(self) -> bool {
        matches!(self, FieldType::Text)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Text => write!(f, "text"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// A single field of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as used in `where__`/`order__` keys and in storage
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Field layout of a record type
///
/// Every field referenced by a filter or ordering directive must be
/// declared here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity (table) name
    pub name: String,
    /// Declared fields, in storage order
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl EntitySchema {
    /// Create a schema with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type,
        });
        self
    }

    /// Load a schema from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let schema: Self = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Look up a field definition
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Type of a field, failing with `UnknownField` if it is not declared
    pub fn field_type(&self, name: &str) -> Result<FieldType> {
        self.get_field(name)
            .map(|f| f.field_type)
            .ok_or_else(|| Error::unknown_field(name))
    }

    /// Whether the schema declares a field
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Field names in storage order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Check identifiers and duplicate fields
    pub fn validate(&self) -> Result<()> {
        if !is_valid_identifier(&self.name) {
            return Err(Error::config(format!(
                "Invalid entity name '{}'",
                self.name
            )));
        }
        if self.fields.is_empty() {
            return Err(Error::config(format!(
                "Entity '{}' has no fields",
                self.name
            )));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if !is_valid_identifier(&field.name) {
                return Err(Error::config(format!(
                    "Invalid field name '{}' in entity '{}'",
                    field.name, self.name
                )));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::config(format!(
                    "Duplicate field '{}' in entity '{}'",
                    field.name, self.name
                )));
            }
        }
        Ok(())
    }
}
