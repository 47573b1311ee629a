//! Store access for Canopy.
//!
//! This crate defines the typed query model the translation layer
//! compiles into, the [`EntityStore`] trait the gateway executes
//! against, and two implementations: [`MemoryStore`] for tests and
//! ephemeral serving, [`SqliteStore`] for durable data. The bulk delete
//! executor lives here too, since batching is a store concern rather
//! than an HTTP one.

mod bulk;
mod error;
mod memory;
mod query;
mod sqlite;

pub use bulk::{delete_in_batches, DELETE_BATCH_SIZE};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{FetchOptions, FilterOperator, FilterPredicate, Query, QueryFilter};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use canopy_types::{Entity, Key};

/// A handle to the entity store the gateway administers.
///
/// Implementations scan in their native order and never reorder
/// results; `FetchOptions::chunk_size` is a paging hint they are free
/// to ignore.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Execute a query, returning at most `options.limit` matching
    /// entities. Keys-only queries return entities stripped of their
    /// properties.
    async fn run_query(&self, query: &Query, options: &FetchOptions) -> StoreResult<Vec<Entity>>;

    /// Delete the given keys. Keys that are no longer present are
    /// skipped silently; an empty slice is a no-op.
    async fn delete(&self, keys: &[Key]) -> StoreResult<()>;

    /// The distinct kinds currently present, in ascending order.
    async fn kinds(&self) -> StoreResult<Vec<String>>;
}
