//! Embedded SQLite store.
//!
//! One connection guarded by a mutex. Every query runs on the blocking pool so
//! request handlers never stall the async runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::Connection;

use super::schema::SQLITE_SCHEMA;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// SQLite-backed record store. Cheap to clone.
#[derive(Clone)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// `":memory:"` opens a fresh in-memory database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_path = path.clone();

        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            let conn = if open_path.as_os_str() == IN_MEMORY {
                Connection::open_in_memory()?
            } else {
                if let Some(parent) = open_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {}", parent.display())
                    })?;
                }
                let conn = Connection::open(&open_path)
                    .with_context(|| format!("Failed to open {}", open_path.display()))?;
                // Enable WAL mode for concurrent readers
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn
            };
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            conn.execute_batch(SQLITE_SCHEMA)
                .context("Failed to apply database schema")?;
            Ok(conn)
        })
        .await
        .context("Tokio spawn_blocking failed")??;

        tracing::debug!(path = %path.display(), "SQLite store opened");

        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory store.
    pub async fn open_in_memory() -> Result<Self> {
        Self::open(IN_MEMORY).await
    }

    /// Location the store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the connection on the blocking pool.
    pub(crate) async fn call<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }

    /// Trivial query used by the readiness probe.
    pub async fn ping(&self) -> Result<()> {
        self.call(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
