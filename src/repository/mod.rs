//! Repository module
//!
//! The storage contract the paginators run against. A repository accepts
//! structured [`FindOptions`] and returns typed records; how it evaluates
//! the predicates is its own business.
//!
//! Implementations:
//! - [`MemoryRepository`] evaluates predicates in process
//! - [`DuckDbRepository`](crate::database::DuckDbRepository) renders SQL

mod memory;

pub use memory::MemoryRepository;

use crate::error::Result;
use crate::query::FindOptions;
use crate::schema::EntitySchema;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// A record that can be paginated by cursor
pub trait Record: Serialize + Send + Sync {
    /// Monotonic identifier used as the cursor
    fn id(&self) -> i64;
}

/// Storage handle used by the paginators
#[async_trait]
pub trait Repository: Send + Sync {
    /// Record type returned by queries
    type Record: Record;

    /// Field layout of the stored records
    fn schema(&self) -> &EntitySchema;

    /// Fetch records matching the options
    async fn find(&self, options: &FindOptions) -> Result<Vec<Self::Record>>;

    /// Fetch records matching the options, plus the number of matching
    /// records ignoring `take`/`skip`
    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<Self::Record>, u64)>;
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    type Record = R::Record;

    fn schema(&self) -> &EntitySchema {
        (**self).schema()
    }

    async fn find(&self, options: &FindOptions) -> Result<Vec<Self::Record>> {
        (**self).find(options).await
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<Self::Record>, u64)> {
        (**self).find_and_count(options).await
    }
}
