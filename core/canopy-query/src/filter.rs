//! The filter grammar: `<field> <op> <Kind>(<value>)`.
//!
//! A single regex carves out the four parts. The field is any run of
//! characters free of operator symbols, and the value is everything
//! between the kind's opening parenthesis and the final one, so key
//! paths like `Key(Org(1)/Person(2))` stay parseable. The kind
//! whitelist is narrower than the registry: only String, Long, Key,
//! Boolean, Email, and Null may appear in a filter. `__key__` filters
//! override the declared kind to KEY, which lets clients paste a
//! `__key__` column value straight back into a filter.

use canopy_store::{FilterOperator, FilterPredicate};
use canopy_types::{ValueKind, KEY_PROPERTY};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{QueryError, QueryResult};

static FILTER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([^<>=!]+) ([<>=!]+) (String|Long|Key|Boolean|Email|Null)\((.*)\)$")
        .expect("valid pattern")
});

/// Parse one filter expression into a typed predicate.
pub fn parse_filter(filter: &str) -> QueryResult<FilterPredicate> {
    let caps = FILTER_PATTERN
        .captures(filter)
        .ok_or_else(|| QueryError::FilterFormat(filter.to_string()))?;

    let field = &caps[1];
    let op = FilterOperator::from_symbol(&caps[2])
        .ok_or_else(|| QueryError::UnknownOperator(caps[2].to_string()))?;

    let mut kind = ValueKind::from_tag(&caps[3])?;
    if field == KEY_PROPERTY {
        kind = ValueKind::Key;
    }

    let value = kind.decode(&caps[4])?;
    Ok(FilterPredicate::new(field, op, value))
}

/// Parse a batch of filter expressions, failing on the first bad one.
pub fn parse_filters(filters: &[String]) -> QueryResult<Vec<FilterPredicate>> {
    if !filters.is_empty() {
        debug!("parsing {} filter(s)", filters.len());
    }
    filters.iter().map(|filter| parse_filter(filter)).collect()
}
