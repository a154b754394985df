//! Database repository support via DuckDB
//!
//! Translates [`FindOptions`](crate::query::FindOptions) into parameterized
//! SQL and executes it with DuckDB as the query engine.

mod engine;
mod sql;

pub use engine::DuckDbRepository;
pub use sql::{quote_ident, render_count, render_select, SqlParam, SqlQuery};
