//! Directive key parser
//!
//! Turns `where__<field>`, `where__<field>__<operator>` and `order__<field>`
//! parameter keys into a [`Directive`]. Keys without one of the two prefixes
//! are not directives (`take`, `page`, ...) and parse to `None`.

use super::operator::Operator;
use crate::error::{Error, Result};
use crate::schema::is_valid_identifier;
use crate::types::{KEY_DELIMITER, ORDER_PREFIX, WHERE_PREFIX};

/// A parsed filter or ordering directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `where__<field>[__<operator>]`, no operator means equality
    Where {
        field: String,
        operator: Option<Operator>,
    },
    /// `order__<field>`
    Order { field: String },
}

impl Directive {
    /// Field the directive applies to
    pub fn field(&self) -> &str {
        match self {
            Directive::Where { field, .. } | Directive::Order { field } => field,
        }
    }

    /// Effective operator of a filter directive
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Directive::Where { operator, .. } => Some(operator.unwrap_or(Operator::Equal)),
            Directive::Order { .. } => None,
        }
    }
}

/// Check whether a key carries one of the directive prefixes
pub fn is_directive_key(key: &str) -> bool {
    has_prefix(key, WHERE_PREFIX) || has_prefix(key, ORDER_PREFIX)
}

fn has_prefix(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(KEY_DELIMITER))
}

/// Parse a parameter key into a directive
pub fn parse_key(key: &str) -> Result<Option<Directive>> {
    if !is_directive_key(key) {
        return Ok(None);
    }

    let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
    let directive = match segments.as_slice() {
        [WHERE_PREFIX, field] => Directive::Where {
            field: checked_field(key, field)?,
            operator: None,
        },
        [WHERE_PREFIX, field, operator] => {
            if operator.is_empty() {
                return Err(Error::malformed_key(key));
            }
            let field = checked_field(key, field)?;
            Directive::Where {
                field,
                operator: Some(Operator::resolve(operator)?),
            }
        }
        [ORDER_PREFIX, field] => Directive::Order {
            field: checked_field(key, field)?,
        },
        _ => return Err(Error::malformed_key(key)),
    };

    Ok(Some(directive))
}

fn checked_field(key: &str, field: &str) -> Result<String> {
    if is_valid_identifier(field) {
        Ok(field.to_string())
    } else {
        Err(Error::malformed_key(key))
    }
}
