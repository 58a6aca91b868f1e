//! SQLite document store
//!
//! Manages the `~/.ranch-academy/academy.db` database with a schema
//! version check. Documents are stored as JSON text keyed by path.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use super::{collection_of, merge, DocumentStore};
use crate::config::Config;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Database wrapper, shared across threads through an internal mutex
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at the default location (~/.ranch-academy/academy.db)
    pub fn open_default() -> Result<Self> {
        Self::open(&Config::global_config_dir().join("academy.db"))
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store db: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::from_connection(conn)
    }

    /// In-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("store lock poisoned"))
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.check_version()
    }

    /// Refuse databases written by a newer schema
    fn check_version(&self) -> Result<()> {
        let conn = self.conn()?;

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .context("Failed to read schema version")?;
        if version > SCHEMA_VERSION {
            bail!(
                "store schema v{} is newer than supported v{}",
                version,
                SCHEMA_VERSION
            );
        }

        conn.execute("INSERT OR IGNORE INTO schema_version VALUES (?1)", [SCHEMA_VERSION])?;
        Ok(())
    }

    /// Number of stored documents
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

fn parse_doc(path: &str, data: &str) -> Result<Value> {
    serde_json::from_str(data).with_context(|| format!("Corrupt document at {}", path))
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &str) -> Result<Option<Value>> {
        let conn = self.conn()?;
        let data: Option<String> = conn
            .query_row("SELECT data FROM documents WHERE path = ?1", [path], |r| r.get(0))
            .optional()
            .with_context(|| format!("Failed to read {}", path))?;
        data.map(|d| parse_doc(path, &d)).transpose()
    }

    fn set(&self, path: &str, doc: &Value) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let data = serde_json::to_string(doc)?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO documents (path, collection, data, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(path) DO UPDATE SET data = ?3, updated_at = ?4
            "#,
            rusqlite::params![path, collection_of(path), data, now],
        )
        .with_context(|| format!("Failed to write {}", path))?;
        Ok(())
    }

    fn update(&self, path: &str, patch: &Value) -> Result<Option<Value>> {
        let now = Utc::now().timestamp_millis();
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let data: Option<String> = tx
            .query_row("SELECT data FROM documents WHERE path = ?1", [path], |r| r.get(0))
            .optional()?;
        let Some(data) = data else {
            return Ok(None);
        };

        let mut doc = parse_doc(path, &data)?;
        merge(&mut doc, patch);
        tx.execute(
            "UPDATE documents SET data = ?2, updated_at = ?3 WHERE path = ?1",
            rusqlite::params![path, serde_json::to_string(&doc)?, now],
        )?;
        tx.commit()
            .with_context(|| format!("Failed to update {}", path))?;

        Ok(Some(doc))
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT path, data FROM documents WHERE collection = ?1 ORDER BY path",
        )?;
        let rows: Vec<(String, String)> = stmt
            .query_map([collection], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<_>>()
            .with_context(|| format!("Failed to list {}", collection))?;

        rows.into_iter()
            .map(|(path, data)| {
                let doc = parse_doc(&path, &data)?;
                Ok((path, doc))
            })
            .collect()
    }
}

/// SQL schema for the document store
const SCHEMA_SQL: &str = r#"
-- One row per document; collection is the parent path
CREATE TABLE IF NOT EXISTS documents (
    path TEXT PRIMARY KEY,
    collection TEXT NOT NULL,
    data TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
"#;
