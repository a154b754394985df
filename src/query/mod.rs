//! Query module
//!
//! Builds a structured [`PaginationQuery`] out of a flat parameter map.
//!
//! # Overview
//!
//! ```text
//! take=10&page=2&where__likeCount__more_than=5&order__createdAt=DESC
//!   → filters { likeCount: MoreThan(5) }
//!     order   [createdAt DESC]
//!     take 10, skip 10
//! ```

mod composer;
mod types;

pub use composer::compose;
pub use types::{FilterSet, FindOptions, OrderSpec, PaginationQuery, QueryOverrides};
