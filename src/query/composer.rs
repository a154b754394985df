//! Query composer
//!
//! Routes every directive key through the key parser, checks fields against
//! the entity schema and derives page size and offset. Everything here runs
//! before the repository is touched, so a bad request has no side effects.

use super::types::{skip_for, FilterSet, OrderSpec, PaginationQuery};
use crate::config::PaginateConfig;
use crate::error::{Error, Result};
use crate::filter::{parse_key, Directive, Operator};
use crate::schema::EntitySchema;
use crate::types::{Direction, QueryParams, PAGE_PARAM, TAKE_PARAM};

/// Compose a query from request parameters
pub fn compose(
    params: &QueryParams,
    schema: &EntitySchema,
    config: &PaginateConfig,
) -> Result<PaginationQuery> {
    let mut filters = FilterSet::new();
    let mut order = OrderSpec::new();

    for (key, value) in params.iter() {
        let Some(directive) = parse_key(key)? else {
            continue;
        };
        let field_type = schema.field_type(directive.field())?;

        match directive {
            Directive::Where { field, operator } => {
                let predicate = operator
                    .unwrap_or(Operator::Equal)
                    .build(&field, field_type, value)?;
                filters.insert(field, predicate);
            }
            Directive::Order { field } => {
                let direction = Direction::parse(&field, value)?;
                order.set(field, direction);
            }
        }
    }

    let take = parse_take(params, config)?;
    let page = parse_page(params)?;
    let skip = page.map(|page| skip_for(page, take));

    tracing::debug!(
        entity = %schema.name,
        filters = filters.len(),
        order = order.len(),
        take,
        ?page,
        "Composed pagination query"
    );

    Ok(PaginationQuery {
        page,
        take,
        skip,
        filters,
        order,
    })
}

/// Page size from `take`, falling back to the configured default
fn parse_take(params: &QueryParams, config: &PaginateConfig) -> Result<u32> {
    let Some(raw) = params.get(TAKE_PARAM) else {
        return Ok(config.default_take);
    };

    let take: u32 = raw.trim().parse().map_err(|_| {
        Error::invalid_param(TAKE_PARAM, format!("'{raw}' is not a positive integer"))
    })?;
    if take == 0 {
        return Err(Error::invalid_param(TAKE_PARAM, "must be greater than 0"));
    }

    match config.max_take {
        Some(max) if take > max => {
            tracing::warn!(take, max, "Requested page size exceeds maximum, clamping");
            Ok(max)
        }
        _ => Ok(take),
    }
}

/// Page number; absent, empty and `0` all mean "no page"
fn parse_page(params: &QueryParams) -> Result<Option<u32>> {
    let Some(raw) = params.get(PAGE_PARAM).map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }

    let page: u32 = raw.parse().map_err(|_| {
        Error::invalid_param(PAGE_PARAM, format!("'{raw}' is not a non-negative integer"))
    })?;
    Ok((page > 0).then_some(page))
}
