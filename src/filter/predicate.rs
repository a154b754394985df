//! Typed filter values and predicates
//!
//! A predicate is what a repository receives for a single field. Repositories
//! either translate it into their own query language (see the SQL renderer)
//! or evaluate it directly against a JSON view of a record.

use super::operator::Operator;
use crate::error::{Error, Result};
use crate::schema::FieldType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Timestamp layouts accepted besides RFC 3339
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A filter operand parsed according to the field type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    /// Parse a raw parameter value for a field of the given type
    pub fn parse(field: &str, field_type: FieldType, raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidFilterValue {
            field: field.to_string(),
            value: raw.to_string(),
            expected: field_type.to_string(),
        };

        match field_type {
            FieldType::Integer => raw.trim().parse().map(Self::Integer).map_err(|_| invalid()),
            FieldType::Float => raw.trim().parse().map(Self::Float).map_err(|_| invalid()),
            FieldType::Text => Ok(Self::Text(raw.to_string())),
            FieldType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Self::Boolean(true)),
                "false" | "0" => Ok(Self::Boolean(false)),
                _ => Err(invalid()),
            },
            FieldType::Timestamp => parse_timestamp(raw.trim())
                .map(Self::Timestamp)
                .ok_or_else(invalid),
        }
    }

    /// Compare a record value against this operand
    ///
    /// Returns `None` when the record value is null or of an incompatible type.
    pub fn compare(&self, record_value: &Value) -> Option<Ordering> {
        match self {
            Self::Integer(expected) => match record_value.as_i64() {
                Some(actual) => Some(actual.cmp(expected)),
                None => record_value.as_f64()?.partial_cmp(&(*expected as f64)),
            },
            Self::Float(expected) => record_value.as_f64()?.partial_cmp(expected),
            Self::Text(expected) => Some(record_value.as_str()?.cmp(expected.as_str())),
            Self::Boolean(expected) => Some(record_value.as_bool()?.cmp(expected)),
            Self::Timestamp(expected) => {
                let actual = parse_timestamp(record_value.as_str()?)?;
                Some(actual.cmp(expected))
            }
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

/// Parse an RFC 3339 timestamp, a naive date-time (taken as UTC) or a date
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// A field-level comparison condition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    Equals(FilterValue),
    Not(FilterValue),
    MoreThan(FilterValue),
    MoreThanOrEqual(FilterValue),
    LessThan(FilterValue),
    LessThanOrEqual(FilterValue),
    /// Inclusive range
    Between(FilterValue, FilterValue),
    In(Vec<FilterValue>),
    /// Substring match
    Like {
        needle: String,
        case_insensitive: bool,
    },
}

impl Predicate {
    /// Operator that produces this predicate
    pub fn operator(&self) -> Operator {
        match self {
            Self::Equals(_) => Operator::Equal,
            Self::Not(_) => Operator::Not,
            Self::MoreThan(_) => Operator::MoreThan,
            Self::MoreThanOrEqual(_) => Operator::MoreThanOrEqual,
            Self::LessThan(_) => Operator::LessThan,
            Self::LessThanOrEqual(_) => Operator::LessThanOrEqual,
            Self::Between(..) => Operator::Between,
            Self::In(_) => Operator::In,
            Self::Like {
                case_insensitive: false,
                ..
            } => Operator::Like,
            Self::Like {
                case_insensitive: true,
                ..
            } => Operator::ILike,
        }
    }

    /// Evaluate the predicate against a record value
    ///
    /// Null or missing values never match, mirroring SQL comparison semantics.
    pub fn matches(&self, value: &Value) -> bool {
        if value.is_null() {
            return false;
        }
        match self {
            Self::Equals(v) => v.compare(value) == Some(Ordering::Equal),
            Self::Not(v) => matches!(v.compare(value), Some(o) if o != Ordering::Equal),
            Self::MoreThan(v) => v.compare(value) == Some(Ordering::Greater),
            Self::MoreThanOrEqual(v) => matches!(
                v.compare(value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::LessThan(v) => v.compare(value) == Some(Ordering::Less),
            Self::LessThanOrEqual(v) => {
                matches!(v.compare(value), Some(Ordering::Less | Ordering::Equal))
            }
            Self::Between(low, high) => {
                matches!(low.compare(value), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(high.compare(value), Some(Ordering::Less | Ordering::Equal))
            }
            Self::In(values) => values
                .iter()
                .any(|v| v.compare(value) == Some(Ordering::Equal)),
            Self::Like {
                needle,
                case_insensitive,
            } => {
                let Some(haystack) = value.as_str() else {
                    return false;
                };
                if *case_insensitive {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                } else {
                    haystack.contains(needle.as_str())
                }
            }
        }
    }
}
