use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::schema::{SCHEMA_STATEMENTS, SELECT_VALUE, UPSERT_VALUE};
use super::KeyValueStore;
use crate::error::{Error, Result};

/// Key-value store backed by a `SQLite` file.
///
/// The connection is shared behind a mutex and every call runs on tokio's
/// blocking pool, so callers never block the async runtime.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a key-value database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the table cannot
    /// be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Self::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initialize_schema(conn: &Connection) -> Result<()> {
        for statement in SCHEMA_STATEMENTS {
            conn.execute(statement, [])?;
        }
        Ok(())
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| Error::internal("sqlite connection mutex poisoned"))?;
            f(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("sqlite task failed: {e}")))?
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row(SELECT_VALUE, [&key], |row| row.get(0))
                .optional()
                .map_err(|e| Error::storage_read(key.as_str(), e.to_string()))
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        let len = value.len();
        self.with_conn(move |conn| {
            conn.execute(UPSERT_VALUE, params![key, value])
                .map_err(|e| Error::storage_write(key.as_str(), e.to_string()))?;
            debug!("Wrote {} bytes to key '{}'", len, key);
            Ok(())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        if self.path.as_os_str() == ":memory:" {
            return Ok(());
        }
        self.with_conn(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            Ok(())
        })
        .await?;
        debug!("Checkpointed database at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
        assert_eq!(store.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("pets").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("theme", "dark".to_string()).await.unwrap();
        store.set("theme", "light".to_string()).await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_different_keys() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = tokio::join!(
            store.set("pets", "[]".to_string()),
            store.set("vaccinations", "[]".to_string()),
        );
        a.unwrap();
        b.unwrap();
        assert!(store.get("pets").await.unwrap().is_some());
        assert!(store.get("vaccinations").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reopen_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("pettrack.db");

        let store = SqliteStore::open(&db_path).unwrap();
        store
            .set("pets", r#"[{"id":"1"}]"#.to_string())
            .await
            .unwrap();
        store.close().await.unwrap();
        drop(store);

        let reopened = SqliteStore::open(&db_path).unwrap();
        assert_eq!(
            reopened.get("pets").await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
        assert_eq!(reopened.path(), db_path);
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/pettrack.db");

        let store = SqliteStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        store.close().await.unwrap();
    }
}
