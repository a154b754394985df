//! Query types
//!
//! What the composer understood from a request, and the storage-facing
//! options a repository executes.

use crate::filter::Predicate;
use crate::types::Direction;
use std::collections::BTreeMap;

/// Field → predicate, one predicate per field
pub type FilterSet = BTreeMap<String, Predicate>;

/// Ordered field → direction list, one entry per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    entries: Vec<(String, Direction)>,
}

impl OrderSpec {
    /// Create an empty ordering
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction of a field; an existing entry keeps its position
    pub fn set(&mut self, field: impl Into<String>, direction: Direction) -> &mut Self {
        let field = field.into();
        if let Some(entry) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = direction;
        } else {
            self.entries.push((field, direction));
        }
        self
    }

    /// Builder-style set
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.set(field, direction);
        self
    }

    /// Direction of a field, if ordered by it
    pub fn get(&self, field: &str) -> Option<Direction> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, d)| *d)
    }

    /// Iterate in ordering priority
    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.entries.iter().map(|(f, d)| (f.as_str(), *d))
    }

    /// Whether no ordering was requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of ordered fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Query composed from request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationQuery {
    /// Requested page; `None` selects cursor pagination
    pub page: Option<u32>,
    /// Page size
    pub take: u32,
    /// Rows to skip, only in offset mode
    pub skip: Option<u64>,
    /// Filter predicates
    pub filters: FilterSet,
    /// Ordering
    pub order: OrderSpec,
}

impl PaginationQuery {
    /// Storage options for this query
    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            filters: self.filters.clone(),
            order: self.order.clone(),
            take: Some(self.take),
            skip: self.skip,
        }
    }

    /// Merge caller overrides on top of the request; overrides win
    pub fn apply_overrides(&mut self, overrides: &QueryOverrides) {
        for (field, predicate) in &overrides.filters {
            self.filters.insert(field.clone(), predicate.clone());
        }
        if let Some(order) = &overrides.order {
            self.order = order.clone();
        }
        if let Some(take) = overrides.take {
            self.take = take;
            self.skip = self.page.map(|page| skip_for(page, take));
        }
    }
}

/// Rows skipped before `page` (1-based)
pub(crate) fn skip_for(page: u32, take: u32) -> u64 {
    u64::from(take) * u64::from(page.saturating_sub(1))
}

/// Server-side adjustments applied after the request is composed
///
/// Typical use: scoping a listing to the current user regardless of what
/// the client asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOverrides {
    /// Predicates that replace request predicates on the same field
    pub filters: FilterSet,
    /// Ordering that replaces the requested ordering
    pub order: Option<OrderSpec>,
    /// Page size that replaces the requested one
    pub take: Option<u32>,
}

impl QueryOverrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a predicate on a field
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.filters.insert(field.into(), predicate);
        self
    }

    /// Force an ordering
    #[must_use]
    pub fn order(mut self, order: OrderSpec) -> Self {
        self.order = Some(order);
        self
    }

    /// Force a page size
    #[must_use]
    pub fn take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }
}

/// Options a repository executes: filter, order, limit and offset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub filters: FilterSet,
    pub order: OrderSpec,
    pub take: Option<u32>,
    pub skip: Option<u64>,
}
