//! Bulk deletion: run a query keys-only and delete in fixed batches.

use canopy_types::Key;
use tracing::info;

use crate::{EntityStore, FetchOptions, Query, StoreResult};

/// Keys per delete call.
pub const DELETE_BATCH_SIZE: usize = 1000;

/// Delete every entity matching `query`, up to `options.limit`, in
/// batches of [`DELETE_BATCH_SIZE`]. Returns how many were deleted.
///
/// The final batch is issued even when empty, so a store that treats
/// deletes as a sync point always sees one trailing call. A failed
/// batch aborts the run; earlier batches stay deleted and are not
/// counted back.
pub async fn delete_in_batches(
    store: &dyn EntityStore,
    query: Query,
    options: FetchOptions,
) -> StoreResult<usize> {
    let query = query.keys_only();
    let entities = store.run_query(&query, &options).await?;

    let mut deleted = 0;
    let mut batch: Vec<Key> = Vec::with_capacity(DELETE_BATCH_SIZE);
    for entity in entities {
        batch.push(entity.into_key());
        if batch.len() == DELETE_BATCH_SIZE {
            info!("deleting batch of {}", batch.len());
            store.delete(&batch).await?;
            deleted += batch.len();
            batch.clear();
        }
    }
    info!("deleting final batch of {}", batch.len());
    store.delete(&batch).await?;
    deleted += batch.len();

    Ok(deleted)
}
