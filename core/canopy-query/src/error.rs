//! Error types for query construction.

use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    /// A query needs a kind, an ancestor, or both.
    #[error("no 'kind' or 'ancestor' argument")]
    MissingTarget,

    /// The filter string did not match the grammar at all.
    #[error("unable to parse filter `{0}`: expected `<field> <op> <Kind>(<value>)`")]
    FilterFormat(String),

    /// The operator position held symbol characters, but not a known
    /// operator.
    #[error("no comparison operator `{0}`")]
    UnknownOperator(String),

    /// Key parsing or value decoding failed inside a parameter.
    #[error(transparent)]
    Value(#[from] canopy_types::Error),
}
