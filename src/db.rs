use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::store::{KeyValueStore, StorageError};

/// SQLite-backed string key-value substrate.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, now],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContinueWatchingStore, MovieCandidate, STORAGE_KEY};

    fn migrated() -> Database {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.migrate().expect("migrate");
        db
    }

    #[test]
    fn set_then_get_returns_latest_value() {
        let db = migrated();
        db.set("k", "one").expect("first set");
        db.set("k", "two").expect("second set");
        assert_eq!(db.get("k").expect("get").as_deref(), Some("two"));
    }

    #[test]
    fn get_missing_key_returns_none() {
        let db = migrated();
        assert_eq!(db.get("missing").expect("get"), None);
    }

    #[test]
    fn delete_removes_key_and_tolerates_absent_keys() {
        let db = migrated();
        db.set("k", "v").expect("set");
        db.delete("k").expect("delete");
        db.delete("k").expect("second delete");
        assert_eq!(db.get("k").expect("get"), None);
    }

    #[test]
    fn unmigrated_database_reports_errors() {
        let db = Database::open_in_memory().expect("open");
        let err = db.get("k").expect_err("table is missing");
        assert!(matches!(err, StorageError::Sqlite(_)));
    }

    #[test]
    fn shelf_survives_reopening_database_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("cinetrack.db");

        {
            let db = Database::open(&path).expect("open");
            db.migrate().expect("migrate");
            let store = ContinueWatchingStore::new(&db);
            store
                .upsert(&MovieCandidate::new(603, "The Matrix"))
                .expect("upsert");
            store
                .upsert(&MovieCandidate::new(604, "The Matrix Reloaded"))
                .expect("upsert");
        }

        let db = Database::open(&path).expect("reopen");
        db.migrate().expect("migrate is idempotent");
        let store = ContinueWatchingStore::new(&db);
        let entries = store.load();
        assert_eq!(
            entries.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            vec![604, 603]
        );
        assert!(db.get(STORAGE_KEY).expect("get").is_some());
    }
}
