//! Assemble store queries from raw request parameters.

use canopy_store::{Query, QueryFilter};
use canopy_types::Key;

use crate::filter::parse_filters;
use crate::{QueryError, QueryResult};

/// Build a query from the raw `kind`, `ancestor`, and `filter`
/// parameters, empty strings meaning absent. The ancestor uses the
/// standalone key grammar.
pub fn build_query(kind: &str, ancestor: &str, filters: &[String]) -> QueryResult<Query> {
    let mut query = match (kind.is_empty(), ancestor.is_empty()) {
        (true, true) => return Err(QueryError::MissingTarget),
        (true, false) => Query::descendants_of(Key::parse_standalone(ancestor)?),
        (false, true) => Query::of_kind(kind),
        (false, false) => Query::of_kind_under(kind, Key::parse_standalone(ancestor)?),
    };

    let predicates = parse_filters(filters)?;
    if let Some(filter) = QueryFilter::from_predicates(predicates) {
        query = query.filtered(filter);
    }
    Ok(query)
}
