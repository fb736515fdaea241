//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Connections handed to `SqliteStore::try_new` must be migrated.
//! - `set` is a single upsert statement, so a failed write changes nothing.

use super::{decode, encode, KeyValueStore, StoreError, StoreResult};
use crate::db::migrations::latest_version;
use crate::db::DbError;
use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Key-value store over the `kv_store` table.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a connection returned by `db::open_db`/`db::open_db_in_memory`.
    ///
    /// Rejects connections whose schema is not at the latest version.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let latest = latest_version();
        if version > latest {
            return Err(DbError::SchemaTooNew {
                found: version,
                supported: latest,
            }
            .into());
        }
        if version < latest {
            return Err(DbError::SchemaBehind {
                found: version,
                expected: latest,
            }
            .into());
        }
        Ok(Self { conn })
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let text: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        text.map(|text| decode(key, &text)).transpose()
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let text = encode(key, value)?;
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, text],
            )
            .map_err(|err| {
                error!(
                    "event=store_set module=store status=error key={} error={}",
                    key, err
                );
                StoreError::from(err)
            })?;
        Ok(())
    }
}
