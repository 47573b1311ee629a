//! The typed query model: predicates, filters, queries, fetch options,
//! and the match semantics both backends share.
//!
//! Comparisons are same-kind only. A predicate whose expected value has
//! a different kind than the stored one never matches (equality included
//! -- `Integer(1)` and `Float(1.0)` are distinct), which keeps both
//! backends byte-for-byte agreed on every edge case.

use std::cmp::Ordering;

use canopy_types::{Entity, Key, PropertyValue, KEY_PROPERTY};

/// Comparison operators the filter grammar exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 6] = [
        FilterOperator::LessThan,
        FilterOperator::LessThanOrEqual,
        FilterOperator::GreaterThan,
        FilterOperator::GreaterThanOrEqual,
        FilterOperator::Equal,
        FilterOperator::NotEqual,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            FilterOperator::LessThan => "<",
            FilterOperator::LessThanOrEqual => "<=",
            FilterOperator::GreaterThan => ">",
            FilterOperator::GreaterThanOrEqual => ">=",
            FilterOperator::Equal => "=",
            FilterOperator::NotEqual => "!=",
        }
    }

    /// Resolve a symbol by scanning [`FilterOperator::ALL`].
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        FilterOperator::ALL
            .iter()
            .copied()
            .find(|op| op.symbol() == symbol)
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::LessThan => ordering == Ordering::Less,
            FilterOperator::LessThanOrEqual => ordering != Ordering::Greater,
            FilterOperator::GreaterThan => ordering == Ordering::Greater,
            FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            FilterOperator::Equal => ordering == Ordering::Equal,
            FilterOperator::NotEqual => ordering != Ordering::Equal,
        }
    }
}

/// One `field op value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    pub field: String,
    pub op: FilterOperator,
    pub value: PropertyValue,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, op: FilterOperator, value: PropertyValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Whether an entity satisfies this predicate. The reserved
    /// [`KEY_PROPERTY`] field compares against the entity's key; any
    /// other field missing from the entity never matches.
    pub fn matches(&self, entity: &Entity) -> bool {
        let key_value;
        let actual = if self.field == KEY_PROPERTY {
            key_value = PropertyValue::Key(entity.key().clone());
            &key_value
        } else {
            match entity.property(&self.field) {
                Some(value) => value,
                None => return false,
            }
        };
        evaluate(self.op, actual, &self.value)
    }
}

fn evaluate(op: FilterOperator, actual: &PropertyValue, expected: &PropertyValue) -> bool {
    match op {
        FilterOperator::Equal => actual == expected,
        FilterOperator::NotEqual => actual != expected,
        _ => compare_same_kind(actual, expected).is_some_and(|ordering| op.accepts(ordering)),
    }
}

/// Natural order within a kind; `None` across kinds and for the kinds
/// that have no order.
fn compare_same_kind(a: &PropertyValue, b: &PropertyValue) -> Option<Ordering> {
    use PropertyValue as V;
    match (a, b) {
        (V::Integer(x), V::Integer(y)) => Some(x.cmp(y)),
        (V::Float(x), V::Float(y)) => x.partial_cmp(y),
        (V::Boolean(x), V::Boolean(y)) => Some(x.cmp(y)),
        (V::String(x), V::String(y)) => Some(x.cmp(y)),
        (V::Text(x), V::Text(y)) => Some(x.cmp(y)),
        (V::Timestamp(x), V::Timestamp(y)) => Some(x.cmp(y)),
        (V::PostalAddress(x), V::PostalAddress(y)) => Some(x.cmp(y)),
        (V::PhoneNumber(x), V::PhoneNumber(y)) => Some(x.cmp(y)),
        (V::Email(x), V::Email(y)) => Some(x.cmp(y)),
        (V::Link(x), V::Link(y)) => Some(x.cmp(y)),
        (V::Category(x), V::Category(y)) => Some(x.cmp(y)),
        (V::Rating(x), V::Rating(y)) => Some(x.cmp(y)),
        (V::Key(x), V::Key(y)) => Some(x.cmp(y)),
        (V::Geo(x), V::Geo(y)) => (x.lat(), x.lon()).partial_cmp(&(y.lat(), y.lon())),
        _ => None,
    }
}

/// A query's filter: one predicate, or a conjunction of several.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Predicate(FilterPredicate),
    And(Vec<FilterPredicate>),
}

impl QueryFilter {
    /// Combine parsed predicates: none stays none, one stays bare, more
    /// become a conjunction.
    pub fn from_predicates(mut predicates: Vec<FilterPredicate>) -> Option<Self> {
        match predicates.len() {
            0 => None,
            1 => Some(QueryFilter::Predicate(predicates.remove(0))),
            _ => Some(QueryFilter::And(predicates)),
        }
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        match self {
            QueryFilter::Predicate(predicate) => predicate.matches(entity),
            QueryFilter::And(predicates) => predicates.iter().all(|p| p.matches(entity)),
        }
    }
}

/// A store query: a kind and/or ancestor constraint plus an optional
/// filter. At least one of kind and ancestor is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    kind: Option<String>,
    ancestor: Option<Key>,
    filter: Option<QueryFilter>,
    keys_only: bool,
}

impl Query {
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ancestor: None,
            filter: None,
            keys_only: false,
        }
    }

    /// Everything on or under `ancestor`, regardless of kind.
    pub fn descendants_of(ancestor: Key) -> Self {
        Self {
            kind: None,
            ancestor: Some(ancestor),
            filter: None,
            keys_only: false,
        }
    }

    pub fn of_kind_under(kind: impl Into<String>, ancestor: Key) -> Self {
        Self {
            kind: Some(kind.into()),
            ancestor: Some(ancestor),
            filter: None,
            keys_only: false,
        }
    }

    pub fn filtered(mut self, filter: QueryFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Ask for keys only; properties are stripped from the results.
    pub fn keys_only(mut self) -> Self {
        self.keys_only = true;
        self
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn ancestor(&self) -> Option<&Key> {
        self.ancestor.as_ref()
    }

    pub fn filter(&self) -> Option<&QueryFilter> {
        self.filter.as_ref()
    }

    pub fn is_keys_only(&self) -> bool {
        self.keys_only
    }

    /// The match semantics shared by every backend: kind, then
    /// ancestry (a key counts as its own ancestor), then the filter.
    pub fn matches(&self, entity: &Entity) -> bool {
        if let Some(kind) = &self.kind {
            if entity.key().kind() != kind {
                return false;
            }
        }
        if let Some(ancestor) = &self.ancestor {
            if !entity.key().has_ancestor(ancestor) {
                return false;
            }
        }
        self.filter.as_ref().is_none_or(|f| f.matches(entity))
    }
}

/// A result limit plus the chunk-size paging hint derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub limit: usize,
    pub chunk_size: usize,
}

impl FetchOptions {
    /// The chunk size tracks the limit below 1000 and a tenth of it
    /// from there up, never dropping under 1.
    pub fn for_limit(limit: usize) -> Self {
        let chunk = if limit < 1000 { limit } else { limit / 10 };
        Self {
            limit,
            chunk_size: chunk.max(1),
        }
    }
}
