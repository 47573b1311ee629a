//! Query construction for Canopy.
//!
//! Translates the gateway's raw string parameters into typed store
//! queries: [`parse_filter`] reads one filter expression, and
//! [`build_query`] assembles the kind/ancestor target with all parsed
//! predicates attached. Everything here is pure translation; execution
//! stays in the store crate.

mod builder;
mod error;
mod filter;

pub use builder::build_query;
pub use error::{QueryError, QueryResult};
pub use filter::{parse_filter, parse_filters};
