//! SQL rendering for find options
//!
//! Produces parameterized statements. Identifiers come from the entity
//! schema (validated, then quoted); every filter operand is bound as a
//! parameter. Page size and offset are typed integers and are inlined.

use crate::error::{Error, Result};
use crate::filter::{FilterValue, Predicate};
use crate::query::{FilterSet, FindOptions};
use crate::schema::EntitySchema;

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

/// A statement with its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Quote an identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `SELECT <fields> FROM <entity> [WHERE ..] [ORDER BY ..] [LIMIT ..] [OFFSET ..]`
///
/// Fails with `UnknownField` if a filter or ordering names a field the
/// schema does not declare.
pub fn render_select(schema: &EntitySchema, options: &FindOptions) -> Result<SqlQuery> {
    check_fields(schema, options)?;
    let columns = schema
        .field_names()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {columns} FROM {}", quote_ident(&schema.name));
    let mut params = Vec::new();

    push_where(&mut sql, &mut params, &options.filters);

    if !options.order.is_empty() {
        let order = options
            .order
            .iter()
            .map(|(field, direction)| {
                format!("{} {} NULLS LAST", quote_ident(field), direction.as_sql())
            })
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(" ORDER BY ");
        sql.push_str(&order);
    }

    if let Some(take) = options.take {
        sql.push_str(&format!(" LIMIT {take}"));
    }
    if let Some(skip) = options.skip {
        sql.push_str(&format!(" OFFSET {skip}"));
    }

    Ok(SqlQuery { sql, params })
}

/// `SELECT COUNT(*) FROM <entity> [WHERE ..]`, ignoring order and window
pub fn render_count(schema: &EntitySchema, options: &FindOptions) -> Result<SqlQuery> {
    check_fields(schema, options)?;
    let mut sql = format!("SELECT COUNT(*) FROM {}", quote_ident(&schema.name));
    let mut params = Vec::new();
    push_where(&mut sql, &mut params, &options.filters);
    Ok(SqlQuery { sql, params })
}

/// Every identifier that reaches the statement must be a declared field
fn check_fields(schema: &EntitySchema, options: &FindOptions) -> Result<()> {
    let order_fields = options.order.iter().map(|(field, _)| field);
    for field in options.filters.keys().map(String::as_str).chain(order_fields) {
        if !schema.has_field(field) {
            return Err(Error::unknown_field(field));
        }
    }
    Ok(())
}

fn push_where(sql: &mut String, params: &mut Vec<SqlParam>, filters: &FilterSet) {
    if filters.is_empty() {
        return;
    }
    let conditions = filters
        .iter()
        .map(|(field, predicate)| render_predicate(field, predicate, params))
        .collect::<Vec<_>>()
        .join(" AND ");
    sql.push_str(" WHERE ");
    sql.push_str(&conditions);
}

fn render_predicate(field: &str, predicate: &Predicate, params: &mut Vec<SqlParam>) -> String {
    let column = quote_ident(field);
    let mut bind = |value: &FilterValue| bind_value(value, params);

    match predicate {
        Predicate::Equals(v) => format!("{column} = {}", bind(v)),
        Predicate::Not(v) => format!("{column} <> {}", bind(v)),
        Predicate::MoreThan(v) => format!("{column} > {}", bind(v)),
        Predicate::MoreThanOrEqual(v) => format!("{column} >= {}", bind(v)),
        Predicate::LessThan(v) => format!("{column} < {}", bind(v)),
        Predicate::LessThanOrEqual(v) => format!("{column} <= {}", bind(v)),
        Predicate::Between(low, high) => {
            let low = bind(low);
            let high = bind(high);
            format!("{column} BETWEEN {low} AND {high}")
        }
        Predicate::In(values) => {
            let placeholders = values.iter().map(&mut bind).collect::<Vec<_>>().join(", ");
            format!("{column} IN ({placeholders})")
        }
        Predicate::Like {
            needle,
            case_insensitive,
        } => {
            let keyword = if *case_insensitive { "ILIKE" } else { "LIKE" };
            params.push(SqlParam::Text(format!("%{}%", escape_like(needle))));
            format!("{column} {keyword} ? ESCAPE '\\'")
        }
    }
}

/// Push a parameter and return its placeholder
fn bind_value(value: &FilterValue, params: &mut Vec<SqlParam>) -> String {
    match value {
        FilterValue::Integer(i) => {
            params.push(SqlParam::Integer(*i));
            "?".to_string()
        }
        FilterValue::Float(f) => {
            params.push(SqlParam::Float(*f));
            "?".to_string()
        }
        FilterValue::Text(s) => {
            params.push(SqlParam::Text(s.clone()));
            "?".to_string()
        }
        FilterValue::Boolean(b) => {
            params.push(SqlParam::Boolean(*b));
            "?".to_string()
        }
        FilterValue::Timestamp(ts) => {
            params.push(SqlParam::Text(
                ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            ));
            "CAST(? AS TIMESTAMP)".to_string()
        }
    }
}

/// Escape LIKE wildcards so the needle matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
