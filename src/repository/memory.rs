//! In-memory repository
//!
//! Evaluates predicates against the JSON form of each record. Used for tests,
//! fixtures and small read-mostly collections.

use super::{Record, Repository};
use crate::error::Result;
use crate::filter::{parse_timestamp, Predicate};
use crate::query::{FindOptions, OrderSpec};
use crate::schema::{EntitySchema, FieldType};
use crate::types::Direction;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

/// Repository backed by a `Vec` of records
#[derive(Debug)]
pub struct MemoryRepository<T> {
    /// Field layout
    schema: EntitySchema,
    /// Stored records, in insertion order
    records: RwLock<Vec<T>>,
    /// Number of queries served
    queries: AtomicUsize,
}

impl<T> MemoryRepository<T>
where
    T: Record + Clone,
{
    /// Create an empty repository
    pub fn new(schema: EntitySchema) -> Self {
        Self::with_records(schema, Vec::new())
    }

    /// Create a repository holding the given records
    pub fn with_records(schema: EntitySchema, records: Vec<T>) -> Self {
        Self {
            schema,
            records: RwLock::new(records),
            queries: AtomicUsize::new(0),
        }
    }

    /// Add a record
    pub async fn insert(&self, record: T) {
        self.records.write().await.push(record);
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the repository holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of `find`/`find_and_count` calls served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }

    /// Filter and sort; returns every match
    async fn matching(&self, options: &FindOptions) -> Result<Vec<T>> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);

        let records = self.records.read().await;
        let mut rows: Vec<(Map<String, Value>, &T)> = Vec::new();
        for record in records.iter() {
            let row = match serde_json::to_value(record)? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            if options
                .filters
                .iter()
                .all(|(field, predicate)| field_matches(&row, field, predicate))
            {
                rows.push((row, record));
            }
        }

        rows.sort_by(|(a, _), (b, _)| compare_rows(&self.schema, &options.order, a, b));
        Ok(rows.into_iter().map(|(_, record)| record.clone()).collect())
    }
}

fn field_matches(row: &Map<String, Value>, field: &str, predicate: &Predicate) -> bool {
    predicate.matches(row.get(field).unwrap_or(&Value::Null))
}

/// Compare two rows by the ordering spec; nulls sort last in both directions
fn compare_rows(
    schema: &EntitySchema,
    order: &OrderSpec,
    a: &Map<String, Value>,
    b: &Map<String, Value>,
) -> Ordering {
    for (field, direction) in order.iter() {
        let field_type = schema.field_type(field).ok();
        let left = a.get(field).unwrap_or(&Value::Null);
        let right = b.get(field).unwrap_or(&Value::Null);

        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = compare_values(field_type, left, right);
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(field_type: Option<FieldType>, left: &Value, right: &Value) -> Ordering {
    if field_type == Some(FieldType::Timestamp) {
        let l = left.as_str().and_then(parse_timestamp);
        let r = right.as_str().and_then(parse_timestamp);
        return l.cmp(&r);
    }
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l.cmp(&r),
            _ => l
                .as_f64()
                .partial_cmp(&r.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(l), Value::String(r)) => l.cmp(r),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl<T> Repository for MemoryRepository<T>
where
    T: Record + Clone,
{
    type Record = T;

    fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    async fn find(&self, options: &FindOptions) -> Result<Vec<T>> {
        let rows = self.matching(options).await?;
        Ok(window(rows, options))
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<T>, u64)> {
        let rows = self.matching(options).await?;
        let total = rows.len() as u64;
        Ok((window(rows, options), total))
    }
}

/// Apply skip/take
fn window<T>(rows: Vec<T>, options: &FindOptions) -> Vec<T> {
    let skip = options.skip.unwrap_or(0) as usize;
    let iter = rows.into_iter().skip(skip);
    match options.take {
        Some(take) => iter.take(take as usize).collect(),
        None => iter.collect(),
    }
}
