// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Query
//!
//! Pagination and dynamic filtering for list endpoints, driven by flat
//! request parameters.
//!
//! ## Features
//!
//! - **Filter keys**: `where__<field>[__<operator>]=<value>`
//! - **Sort keys**: `order__<field>=ASC|DESC`
//! - **Offset pagination**: `page`/`take` with a total count
//! - **Cursor pagination**: id-keyed walk with a ready-made `next` link
//! - **Repositories**: in-memory, or SQL via DuckDB
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_query::{PaginateConfig, Paginator, QueryParams, Result};
//!
//! async fn list_posts(repo: &PostRepository, raw_query: &str) -> Result<serde_json::Value> {
//!     let paginator = Paginator::new(PaginateConfig::from_env()?);
//!     let params = QueryParams::from_query_string(raw_query);
//!
//!     // ?take=10&where__likeCount__more_than=5&order__createdAt=ASC
//!     let page = paginator.paginate(&params, repo, "posts").await?;
//!     Ok(serde_json::to_value(page)?)
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  QueryParams ──► filter::parse_key ──► Operator::build       │
//! │                        │                                     │
//! │                 query::compose ──► PaginationQuery           │
//! └────────────────────────┬─────────────────────────────────────┘
//!                          │
//!          ┌───────────────┴───────────────┐
//!          │  Paginator                    │
//!          ├───────────────┬───────────────┤
//!          │ Offset        │ Cursor        │
//!          │ {data, total} │ {data, cursor,│
//!          │               │  count, next} │
//!          └───────────────┴───────┬───────┘
//!                                  │ FindOptions
//!               ┌──────────────────┴──────────────────┐
//!               │ MemoryRepository │ DuckDbRepository │
//!               └─────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Request parameters and shared constants
pub mod types;

/// Origin and page size configuration
pub mod config;

/// Entity field layouts
pub mod schema;

/// Filter key parsing and the operator registry
pub mod filter;

/// Query composition
pub mod query;

/// Storage contract and the in-memory implementation
pub mod repository;

/// SQL repository via DuckDB
pub mod database;

/// Offset and cursor pagination
pub mod pagination;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::*;

// Re-export commonly used types
pub use config::PaginateConfig;
pub use database::DuckDbRepository;
pub use filter::{Operator, Predicate};
pub use pagination::{CursorPage, OffsetPage, Page, Paginator};
pub use query::{compose, FindOptions, PaginationQuery, QueryOverrides};
pub use repository::{MemoryRepository, Record, Repository};
pub use schema::{EntitySchema, FieldType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
