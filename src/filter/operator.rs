//! Operator registry
//!
//! Maps operator tokens (the last segment of `where__<field>__<operator>`)
//! to predicate constructors. The set of operators is closed: an unknown
//! token is rejected when the key is parsed, before any value is looked at.

use super::predicate::{FilterValue, Predicate};
use crate::error::{Error, Result};
use crate::schema::FieldType;
use std::fmt;
use std::str::FromStr;

/// Filter operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Exact match (also the implicit operator of `where__<field>`)
    Equal,
    /// Not equal
    Not,
    MoreThan,
    MoreThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// Inclusive range, value `low,high`
    Between,
    /// Membership, value `a,b,c`
    In,
    /// Case-sensitive substring
    Like,
    /// Case-insensitive substring
    ILike,
}

impl Operator {
    /// Every registered operator
    pub const ALL: [Operator; 10] = [
        Operator::Equal,
        Operator::Not,
        Operator::MoreThan,
        Operator::MoreThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Between,
        Operator::In,
        Operator::Like,
        Operator::ILike,
    ];

    /// Token used in filter keys
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::Not => "not",
            Operator::MoreThan => "more_than",
            Operator::MoreThanOrEqual => "more_than_or_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanOrEqual => "less_than_or_equal",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::Like => "like",
            Operator::ILike => "i_like",
        }
    }

    /// Resolve an operator token
    pub fn resolve(token: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.token() == token)
            .ok_or_else(|| Error::unknown_operator(token))
    }

    /// Build a typed predicate from the raw parameter value
    pub fn build(self, field: &str, field_type: FieldType, raw: &str) -> Result<Predicate> {
        let parse = |raw: &str| FilterValue::parse(field, field_type, raw);

        match self {
            Operator::Equal => Ok(Predicate::Equals(parse(raw)?)),
            Operator::Not => Ok(Predicate::Not(parse(raw)?)),
            Operator::MoreThan => Ok(Predicate::MoreThan(parse(raw)?)),
            Operator::MoreThanOrEqual => Ok(Predicate::MoreThanOrEqual(parse(raw)?)),
            Operator::LessThan => Ok(Predicate::LessThan(parse(raw)?)),
            Operator::LessThanOrEqual => Ok(Predicate::LessThanOrEqual(parse(raw)?)),
            Operator::Between => {
                let bounds: Vec<&str> = raw.split(',').collect();
                let [low, high] = bounds.as_slice() else {
                    return Err(Error::InvalidOperatorArity {
                        operator: self.token().to_string(),
                        expected: "2".to_string(),
                        found: bounds.len(),
                    });
                };
                Ok(Predicate::Between(parse(*low)?, parse(*high)?))
            }
            Operator::In => {
                let items: Vec<&str> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                if items.is_empty() {
                    return Err(Error::InvalidOperatorArity {
                        operator: self.token().to_string(),
                        expected: "at least 1".to_string(),
                        found: 0,
                    });
                }
                let values = items.into_iter().map(parse).collect::<Result<Vec<_>>>()?;
                Ok(Predicate::In(values))
            }
            Operator::Like | Operator::ILike => {
                if !field_type.is_textual() {
                    return Err(Error::OperatorNotSupported {
                        operator: self.token().to_string(),
                        field: field.to_string(),
                    });
                }
                Ok(Predicate::Like {
                    needle: raw.to_string(),
                    case_insensitive: self == Operator::ILike,
                })
            }
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
