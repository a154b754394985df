//! Filter module
//!
//! The small DSL that encodes filter and sort intent into parameter keys.
//!
//! # Overview
//!
//! ```text
//! where__likeCount__more_than=10   → likeCount > 10
//! where__id__between=3,7           → id BETWEEN 3 AND 7
//! where__title__i_like=rust        → title ILIKE '%rust%'
//! where__author=alice              → author = 'alice'
//! order__createdAt=DESC            → ORDER BY createdAt DESC
//! ```

mod key;
mod operator;
mod predicate;

pub use key::{is_directive_key, parse_key, Directive};
pub use operator::Operator;
pub use predicate::{parse_timestamp, FilterValue, Predicate};

#[cfg(test)]
mod tests;
