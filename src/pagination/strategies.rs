//! Pagination strategy implementations
//!
//! [`Paginator`] composes the request, picks a strategy and runs it.

use super::types::{CursorInfo, CursorPage, EchoParameters, OffsetPage, Page, PaginationMode};
use crate::config::PaginateConfig;
use crate::error::{Error, Result};
use crate::query::{compose, PaginationQuery, QueryOverrides};
use crate::repository::{Record, Repository};
use crate::types::{Direction, QueryParams, CURSOR_AFTER_KEY, CURSOR_BEFORE_KEY};
use url::Url;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Runs a single `find_and_count`; `total` counts every matching record.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetPaginator;

impl OffsetPaginator {
    /// Execute the query for one page
    pub async fn paginate<R: Repository>(
        &self,
        query: &PaginationQuery,
        repository: &R,
    ) -> Result<OffsetPage<R::Record>> {
        let (data, total) = repository.find_and_count(&query.find_options()).await?;

        tracing::debug!(
            page = ?query.page,
            returned = data.len(),
            total,
            "Offset page fetched"
        );
        Ok(OffsetPage { data, total })
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination
///
/// Fetches `take` records and links to the next page by filtering on the id
/// of the last one: `where__id__more_than` when walking the cursor order
/// field ascending, `where__id__less_than` otherwise.
#[derive(Debug, Clone)]
pub struct CursorPaginator<'a> {
    /// Origin and cursor order field
    pub config: &'a PaginateConfig,
    /// Path of the listing endpoint, e.g. "posts"
    pub path: &'a str,
}

impl<'a> CursorPaginator<'a> {
    /// Create a cursor paginator for an endpoint
    pub fn new(config: &'a PaginateConfig, path: &'a str) -> Self {
        Self { config, path }
    }

    /// Execute the query and build the envelope
    pub async fn paginate<R: Repository>(
        &self,
        query: &PaginationQuery,
        params: &QueryParams,
        repository: &R,
    ) -> Result<CursorPage<R::Record>> {
        let mut options = query.find_options();
        options.skip = None;
        let data = repository.find(&options).await?;

        let Some(last_id) = data.last().map(Record::id) else {
            tracing::debug!("Cursor page is empty, no next link");
            return Ok(CursorPage::empty());
        };

        let echo = EchoParameters::for_cursor(params, query);
        let next = self.next_url(&echo, self.cursor_key(query), last_id)?;

        tracing::debug!(returned = data.len(), after = last_id, "Cursor page fetched");
        Ok(CursorPage {
            count: data.len(),
            data,
            cursor: CursorInfo {
                after: Some(last_id),
            },
            next: Some(next),
        })
    }

    /// Cursor filter key for the following page
    pub fn cursor_key(&self, query: &PaginationQuery) -> &'static str {
        match query.order.get(&self.config.cursor_order_field) {
            Some(Direction::Asc) => CURSOR_AFTER_KEY,
            _ => CURSOR_BEFORE_KEY,
        }
    }

    /// `<protocol>://<host>/<path>?<echo>&<cursor_key>=<id>`
    pub fn next_url(
        &self,
        echo: &EchoParameters,
        cursor_key: &str,
        last_id: i64,
    ) -> Result<String> {
        let base = format!("{}/{}", self.config.origin(), self.path.trim_start_matches('/'));
        let mut url = Url::parse(&base)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in echo.iter() {
                pairs.append_pair(key, value);
            }
            pairs.append_pair(cursor_key, &last_id.to_string());
        }
        Ok(url.to_string())
    }
}

// ============================================================================
// Selector
// ============================================================================

/// Entry point: composes a request and paginates it with the right strategy
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginateConfig,
}

impl Paginator {
    /// Create a paginator with the given configuration
    pub fn new(config: PaginateConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &PaginateConfig {
        &self.config
    }

    /// Compose the query for a repository without running it
    pub fn compose<R: Repository>(
        &self,
        params: &QueryParams,
        repository: &R,
    ) -> Result<PaginationQuery> {
        compose(params, repository.schema(), &self.config)
    }

    /// Paginate a listing
    ///
    /// `path` is the endpoint path used in `next` links (e.g. "posts").
    pub async fn paginate<R: Repository>(
        &self,
        params: &QueryParams,
        repository: &R,
        path: &str,
    ) -> Result<Page<R::Record>> {
        self.paginate_with(params, repository, path, &QueryOverrides::default())
            .await
    }

    /// Paginate a listing with server-side overrides merged over the request
    ///
    /// The configuration, the request and the overrides are all checked
    /// before the repository is queried.
    pub async fn paginate_with<R: Repository>(
        &self,
        params: &QueryParams,
        repository: &R,
        path: &str,
        overrides: &QueryOverrides,
    ) -> Result<Page<R::Record>> {
        self.config.validate()?;
        let mut query = self.compose(params, repository)?;
        check_overrides(repository, overrides)?;
        query.apply_overrides(overrides);

        let mode = PaginationMode::select(&query);
        tracing::debug!(?mode, path, "Paginating");

        match mode {
            PaginationMode::Offset { .. } => OffsetPaginator
                .paginate(&query, repository)
                .await
                .map(Page::Offset),
            PaginationMode::Cursor => CursorPaginator::new(&self.config, path)
                .paginate(&query, params, repository)
                .await
                .map(Page::Cursor),
        }
    }
}

/// Override fields must exist like request fields do
fn check_overrides<R: Repository>(repository: &R, overrides: &QueryOverrides) -> Result<()> {
    let schema = repository.schema();
    let order_fields = overrides.order.iter().flat_map(|order| order.iter().map(|(f, _)| f));
    for field in overrides.filters.keys().map(String::as_str).chain(order_fields) {
        if !schema.has_field(field) {
            return Err(Error::unknown_field(field));
        }
    }
    Ok(())
}
