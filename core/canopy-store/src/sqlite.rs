//! SQLite-backed entity store.
//!
//! Each entity is one row: the serde-JSON encoding of the whole entity,
//! plus its key (also serde-JSON, collision-free where the display path
//! is not) for upserts and deletes, its kind for pushdown, and the
//! display path for inspection with the sqlite3 shell. `seq` preserves
//! insertion order, which is the store's native scan order.

use std::path::Path;

use async_trait::async_trait;
use canopy_types::{Entity, Key};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::{EntityStore, FetchOptions, Query, StoreResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entities (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    key_json    TEXT NOT NULL UNIQUE,
    key_path    TEXT NOT NULL,
    kind        TEXT NOT NULL,
    entity_json TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS entities_kind ON entities(kind);
";

/// Durable store over a single SQLite database file.
///
/// The connection sits behind a blocking mutex: admin requests are
/// short and one at a time, so a connection pool would buy nothing.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fresh in-memory database, mostly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert an entity, or replace the one with the same key. Replaced
    /// entities keep their position in scan order.
    pub fn put(&self, entity: &Entity) -> StoreResult<()> {
        let key_json = serde_json::to_string(entity.key())?;
        let entity_json = serde_json::to_string(entity)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO entities (key_json, key_path, kind, entity_json)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key_json) DO UPDATE SET entity_json = excluded.entity_json",
            params![
                key_json,
                entity.key().to_string(),
                entity.key().kind(),
                entity_json
            ],
        )?;
        Ok(())
    }

    pub fn len(&self) -> StoreResult<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entities", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn run_query(&self, query: &Query, options: &FetchOptions) -> StoreResult<Vec<Entity>> {
        let conn = self.conn.lock();
        // Kind is pushed down to SQL; ancestry and filters need the
        // decoded properties and are applied per row.
        let mut stmt = match query.kind() {
            Some(_) => {
                conn.prepare("SELECT entity_json FROM entities WHERE kind = ?1 ORDER BY seq")?
            }
            None => conn.prepare("SELECT entity_json FROM entities ORDER BY seq")?,
        };
        let mut rows = match query.kind() {
            Some(kind) => stmt.query(params![kind])?,
            None => stmt.query([])?,
        };

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            if results.len() == options.limit {
                break;
            }
            let entity_json: String = row.get(0)?;
            let entity: Entity = serde_json::from_str(&entity_json)?;
            if !query.matches(&entity) {
                continue;
            }
            results.push(if query.is_keys_only() {
                Entity::new(entity.key().clone())
            } else {
                entity
            });
        }
        debug!("query returned {} entities", results.len());
        Ok(results)
    }

    async fn delete(&self, keys: &[Key]) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("DELETE FROM entities WHERE key_json = ?1")?;
        for key in keys {
            let key_json = serde_json::to_string(key)?;
            stmt.execute(params![key_json])?;
        }
        Ok(())
    }

    async fn kinds(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT DISTINCT kind FROM entities ORDER BY kind")?;
        let kinds = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(kinds)
    }
}
