//! Key-value persistence adapter.
//!
//! # Responsibility
//! - Map a named collection to one serialized JSON array under a fixed key.
//! - Provide get-all / save-all primitives; nothing finer grained.
//!
//! # Invariants
//! - A missing key reads as an empty collection.
//! - Writes replace the whole value; last write wins.

use crate::db::migrations::{schema_state, verify_store_tables, SchemaState};
use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure: the store is unreachable or holds unreadable data.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite failure.
    Db(DbError),
    /// Connection is not migrated to the schema this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Stored value under `key` is not valid JSON for the collection.
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    /// Collection could not be serialized.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "key-value store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Corrupt { key, source } => {
                write!(f, "stored collection `{key}` is corrupt: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::Corrupt { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named collections persisted by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Boards,
    Cards,
}

impl Collection {
    /// Fixed storage key of this collection.
    pub fn key(self) -> &'static str {
        match self {
            Self::Boards => "boards",
            Self::Cards => "cards",
        }
    }
}

/// Minimal string key-value store, the local-storage contract.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// Reads every record of `collection`, including tombstones, in stored order.
pub fn load_collection<T, S>(store: &S, collection: Collection) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let key = collection.key();
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<T> = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    debug!(
        "event=collection_load module=store status=ok key={key} records={}",
        records.len()
    );
    Ok(records)
}

/// Replaces `collection` with `records`.
pub fn save_collection<T, S>(store: &S, collection: Collection, records: &[T]) -> StoreResult<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let key = collection.key();
    let raw = serde_json::to_string(records).map_err(StoreError::Encode)?;
    store.set(key, &raw)?;
    debug!(
        "event=collection_save module=store status=ok key={key} records={} bytes={}",
        records.len(),
        raw.len()
    );
    Ok(())
}

/// SQLite-backed store over the `kv_store` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection opened through [`crate::db::open_db`].
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process store. Not shared between threads.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    match schema_state(conn)? {
        SchemaState::Current => Ok(verify_store_tables(conn)?),
        SchemaState::Pending { from, to } => Err(StoreError::UninitializedConnection {
            expected_version: to,
            actual_version: from,
        }),
        SchemaState::Newer { found, supported } => Err(StoreError::UninitializedConnection {
            expected_version: supported,
            actual_version: found,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_collection, save_collection, Collection, KeyValueStore, MemoryKeyValueStore};
    use super::StoreError;

    #[test]
    fn missing_key_reads_as_empty_collection() {
        let store = MemoryKeyValueStore::new();
        let records: Vec<serde_json::Value> = load_collection(&store, Collection::Cards).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn save_then_load_preserves_stored_order() {
        let store = MemoryKeyValueStore::new();
        let records = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        save_collection(&store, Collection::Boards, &records).unwrap();

        let loaded: Vec<String> = load_collection(&store, Collection::Boards).unwrap();
        assert_eq!(loaded, records);
        assert!(store.get("boards").unwrap().unwrap().starts_with('['));
    }

    #[test]
    fn corrupt_json_is_reported_with_key() {
        let store = MemoryKeyValueStore::new();
        store.set("cards", "{not json").unwrap();

        let err = load_collection::<serde_json::Value, _>(&store, Collection::Cards).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "cards"));
    }
}
