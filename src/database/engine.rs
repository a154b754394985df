//! DuckDB-backed repository
//!
//! Renders find options to SQL and runs them on a DuckDB connection. DuckDB
//! can attach PostgreSQL, MySQL or SQLite databases, so the same repository
//! serves any of them once the source tables are visible to the connection.

use super::sql::{render_count, render_select, SqlParam, SqlQuery};
use crate::error::{Error, Result};
use crate::query::FindOptions;
use crate::repository::{Record, Repository};
use crate::schema::EntitySchema;
use async_trait::async_trait;
use duckdb::types::{TimeUnit, Value as DbValue};
use duckdb::{Connection, ToSql};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

/// Repository over a single DuckDB table or view
///
/// DuckDB calls are synchronous. Every statement runs on tokio's blocking
/// pool via `spawn_blocking`, one at a time per connection.
pub struct DuckDbRepository<T> {
    /// DuckDB connection
    conn: Arc<Mutex<Connection>>,
    /// Table layout
    schema: Arc<EntitySchema>,
    _record: PhantomData<fn() -> T>,
}

impl<T> DuckDbRepository<T>
where
    T: Record + DeserializeOwned + 'static,
{
    /// Wrap an existing connection
    pub fn new(conn: Connection, schema: EntitySchema) -> Result<Self> {
        schema.validate()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            schema: Arc::new(schema),
            _record: PhantomData,
        })
    }

    /// Create a repository on a fresh in-memory database
    pub fn open_in_memory(schema: EntitySchema) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("Failed to create DuckDB connection: {e}")))?;
        Self::new(conn, schema)
    }

    /// Run raw statements (schema setup, fixtures)
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        let sql = sql.to_string();
        self.with_connection(move |conn| {
            conn.execute_batch(&sql)
                .map_err(|e| Error::storage(format!("Failed to execute batch: {e}")))
        })
        .await
    }

    /// Run `f` with the locked connection on the blocking pool
    async fn with_connection<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| Error::storage("DuckDB connection lock poisoned"))?;
            f(&conn)
        })
        .await
        .map_err(|e| Error::storage(format!("DuckDB task failed: {e}")))?
    }
}

#[async_trait]
impl<T> Repository for DuckDbRepository<T>
where
    T: Record + DeserializeOwned + 'static,
{
    type Record = T;

    fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    async fn find(&self, options: &FindOptions) -> Result<Vec<T>> {
        let query = render_select(&self.schema, options)?;
        let schema = Arc::clone(&self.schema);
        self.with_connection(move |conn| query_records(conn, &schema, &query))
            .await
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<T>, u64)> {
        let select = render_select(&self.schema, options)?;
        let count = render_count(&self.schema, options)?;
        let schema = Arc::clone(&self.schema);

        // Both statements run under one lock so they see the same rows
        self.with_connection(move |conn| {
            let records = query_records(conn, &schema, &select)?;
            let total = query_count(conn, &count)?;
            Ok((records, total))
        })
        .await
    }
}

/// Run a rendered SELECT and decode the rows
fn query_records<T: DeserializeOwned>(
    conn: &Connection,
    schema: &EntitySchema,
    query: &SqlQuery,
) -> Result<Vec<T>> {
    tracing::debug!(sql = %query.sql, params = query.params.len(), "Executing query");

    let mut stmt = conn
        .prepare(&query.sql)
        .map_err(|e| Error::storage(format!("Failed to prepare query: {e}")))?;

    let field_count = schema.fields.len();
    let values = bind_params(&query.params);
    let rows: Vec<Vec<DbValue>> = stmt
        .query_map(values.as_slice(), |row| {
            (0..field_count)
                .map(|i| row.get::<_, DbValue>(i))
                .collect::<duckdb::Result<Vec<_>>>()
        })
        .map_err(|e| Error::storage(format!("Failed to run query: {e}")))?
        .collect::<duckdb::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|row| {
            let object: Map<String, Value> = schema
                .field_names()
                .map(String::from)
                .zip(row.into_iter().map(duckdb_value_to_json))
                .collect();
            serde_json::from_value(Value::Object(object))
                .map_err(|e| Error::storage(format!("Failed to decode row: {e}")))
        })
        .collect()
}

/// Run a rendered COUNT
fn query_count(conn: &Connection, query: &SqlQuery) -> Result<u64> {
    tracing::debug!(sql = %query.sql, params = query.params.len(), "Executing count");

    let values = bind_params(&query.params);
    let count: i64 = conn
        .query_row(&query.sql, values.as_slice(), |row| row.get(0))
        .map_err(|e| Error::storage(format!("Failed to count rows: {e}")))?;
    Ok(count.max(0) as u64)
}

fn bind_params(params: &[SqlParam]) -> Vec<&dyn ToSql> {
    params
        .iter()
        .map(|p| match p {
            SqlParam::Integer(i) => i as &dyn ToSql,
            SqlParam::Float(f) => f as &dyn ToSql,
            SqlParam::Text(s) => s as &dyn ToSql,
            SqlParam::Boolean(b) => b as &dyn ToSql,
        })
        .collect()
}

/// Convert DuckDB Value to JSON Value
fn duckdb_value_to_json(value: DbValue) -> Value {
    match value {
        DbValue::Null => Value::Null,
        DbValue::Boolean(b) => Value::Bool(b),
        DbValue::TinyInt(i) => Value::Number(i.into()),
        DbValue::SmallInt(i) => Value::Number(i.into()),
        DbValue::Int(i) => Value::Number(i.into()),
        DbValue::BigInt(i) => Value::Number(i.into()),
        DbValue::HugeInt(i) => Value::String(i.to_string()),
        DbValue::UTinyInt(i) => Value::Number(i.into()),
        DbValue::USmallInt(i) => Value::Number(i.into()),
        DbValue::UInt(i) => Value::Number(i.into()),
        DbValue::UBigInt(i) => Value::Number(i.into()),
        DbValue::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(Value::Null, Value::Number)
        }
        DbValue::Double(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        DbValue::Text(s) => Value::String(s),
        DbValue::Blob(b) => Value::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        DbValue::Timestamp(unit, i) => {
            let micros = match unit {
                TimeUnit::Second => i.saturating_mul(1_000_000),
                TimeUnit::Millisecond => i.saturating_mul(1_000),
                TimeUnit::Microsecond => i,
                TimeUnit::Nanosecond => i / 1_000,
            };
            chrono::DateTime::from_timestamp_micros(micros)
                .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
                .unwrap_or(Value::Number(i.into()))
        }
        DbValue::Date32(d) => {
            // Days since epoch (719163 is the number of days from 1 CE to 1970-01-01)
            chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163)
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Number(d.into()))
        }
        other => Value::String(format!("{other:?}")),
    }
}
