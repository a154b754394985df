//! Pagination module
//!
//! Supports: Offset (page/take with total), Cursor (id-keyed with next link)
//!
//! # Overview
//!
//! A request with a non-zero `page` is served by offset pagination and
//! returns `{ data, total }`. Any other request walks by cursor and returns
//! `{ data, cursor: { after }, count, next }`, where `next` repeats the
//! request parameters plus one cursor filter on the last record's id.

mod strategies;
mod types;

pub use strategies::{CursorPaginator, OffsetPaginator, Paginator};
pub use types::{
    is_cursor_key, CursorInfo, CursorPage, EchoParameters, OffsetPage, Page, PaginationMode,
};
