//! Pagination types
//!
//! The response envelope shared by both strategies, the mode selector and
//! the parameters echoed into `next` links.

use crate::query::PaginationQuery;
use crate::types::{QueryParams, CURSOR_AFTER_KEY, CURSOR_BEFORE_KEY, PAGE_PARAM, TAKE_PARAM};
use serde::Serialize;

// ============================================================================
// Mode
// ============================================================================

/// Pagination strategy chosen for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Skip/take with a total count
    Offset {
        /// 1-based page number
        page: u32,
    },
    /// Forward-only walk keyed on the record id
    Cursor,
}

impl PaginationMode {
    /// A non-zero page selects offset mode, anything else cursor mode
    pub fn select(query: &PaginationQuery) -> Self {
        match query.page {
            Some(page) if page > 0 => Self::Offset { page },
            _ => Self::Cursor,
        }
    }

    /// Check if this is offset mode
    pub fn is_offset(&self) -> bool {
        matches!(self, Self::Offset { .. })
    }

    /// Check if this is cursor mode
    pub fn is_cursor(&self) -> bool {
        matches!(self, Self::Cursor)
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Offset-mode response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetPage<T> {
    /// Records of the requested page
    pub data: Vec<T>,
    /// Number of matching records, independent of take/skip
    pub total: u64,
}

/// Cursor position of a cursor-mode response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CursorInfo {
    /// Id of the last returned record
    pub after: Option<i64>,
}

/// Cursor-mode response
///
/// `next` is `None` exactly when `data` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorPage<T> {
    pub data: Vec<T>,
    pub cursor: CursorInfo,
    /// Length of `data`
    pub count: usize,
    /// Absolute URL of the following page
    pub next: Option<String>,
}

impl<T> CursorPage<T> {
    /// Response for a walk that ran out of records
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            cursor: CursorInfo::default(),
            count: 0,
            next: None,
        }
    }
}

/// Response envelope of either strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Page<T> {
    Offset(OffsetPage<T>),
    Cursor(CursorPage<T>),
}

impl<T> Page<T> {
    /// Records of this page
    pub fn data(&self) -> &[T] {
        match self {
            Self::Offset(page) => &page.data,
            Self::Cursor(page) => &page.data,
        }
    }

    /// Take the records out of the envelope
    pub fn into_data(self) -> Vec<T> {
        match self {
            Self::Offset(page) => page.data,
            Self::Cursor(page) => page.data,
        }
    }

    /// Offset response, if this is one
    pub fn as_offset(&self) -> Option<&OffsetPage<T>> {
        match self {
            Self::Offset(page) => Some(page),
            Self::Cursor(_) => None,
        }
    }

    /// Cursor response, if this is one
    pub fn as_cursor(&self) -> Option<&CursorPage<T>> {
        match self {
            Self::Cursor(page) => Some(page),
            Self::Offset(_) => None,
        }
    }

    /// `next` link of a cursor response
    pub fn next_url(&self) -> Option<&str> {
        self.as_cursor().and_then(|page| page.next.as_deref())
    }
}

// ============================================================================
// Echo Parameters
// ============================================================================

/// Request parameters repeated verbatim into a `next` link
///
/// Kept apart from the composed query: this is what the client sent, not
/// what the engine understood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoParameters {
    pairs: Vec<(String, String)>,
}

impl EchoParameters {
    /// Collect the parameters to echo for a cursor walk
    ///
    /// Drops both cursor keys, the page number and empty values. When the
    /// request relied on the default page size, the resolved `take` is added
    /// so that every following page has the same size.
    pub fn for_cursor(params: &QueryParams, query: &PaginationQuery) -> Self {
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .filter(|(key, value)| !value.is_empty() && !is_cursor_key(key) && *key != PAGE_PARAM)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        if !params.get(TAKE_PARAM).is_some_and(|v| !v.is_empty()) {
            pairs.push((TAKE_PARAM.to_string(), query.take.to_string()));
        }

        tracing::trace!(echoed = pairs.len(), "Collected echo parameters");
        Self { pairs }
    }

    /// Iterate over (key, value) pairs in request order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of echoed parameters
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing is echoed
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Whether a key is one of the two cursor filters
pub fn is_cursor_key(key: &str) -> bool {
    key == CURSOR_AFTER_KEY || key == CURSOR_BEFORE_KEY
}
