use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::{params, Connection, OptionalExtension};
use tokio::task::spawn_blocking;
use tracing::{debug, info};

use crate::errors::StoreError;

/// Storage for request records, backed by a single SQLite connection that is
/// shared by every in-flight request for the lifetime of the process.
///
/// The connection is not safe for unsynchronized concurrent access, so the
/// store serializes all calls through an internal mutex; callers never
/// coordinate among themselves. Writes run on the blocking pool, keeping the
/// async scheduler free to drive other requests while a write is in flight.
pub struct RecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl RecordStore {
    /// Open the store and create the schema if absent.
    ///
    /// Uses an in-memory database unless a file path is given. A failure here
    /// is fatal: the service must not start serving without a store.
    pub fn open(path: Option<&Path>) -> Result<Self, StoreError> {
        let conn = match path {
            Some(path) => {
                info!("Opening store at {}", path.display());
                Connection::open(path).map_err(StoreError::Open)?
            }
            None => {
                info!("Opening in-memory store");
                Connection::open_in_memory().map_err(StoreError::Open)?
            }
        };

        // Two opaque text columns, no constraints. Uniqueness of ids rests
        // entirely on the generator's collision resistance.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS requests (id TEXT, hash TEXT)",
            [],
        )
        .map_err(StoreError::Schema)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Append one record.
    ///
    /// The write is dispatched to the blocking pool and suspends only the
    /// issuing task; concurrent inserts are mutually exclusive.
    pub async fn insert(&self, id: String, digest: String) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);

        spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.execute(
                "INSERT INTO requests (id, hash) VALUES (?1, ?2)",
                params![id, digest],
            )
            .map_err(StoreError::Write)?;

            debug!("Inserted record {}", id);
            Ok(())
        })
        .await?
    }

    /// Digest stored for the given id, if a matching row exists.
    pub async fn digest_for(&self, id: String) -> Result<Option<String>, StoreError> {
        let conn = Arc::clone(&self.conn);

        spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.query_row(
                "SELECT hash FROM requests WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::Read)
        })
        .await?
    }

    /// Number of records written so far.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let conn = Arc::clone(&self.conn);

        spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0))
                .map_err(StoreError::Read)
        })
        .await?
    }

    /// Drop the requests table so subsequent writes fail. Test-only.
    #[cfg(test)]
    pub(crate) fn drop_table(&self) {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute("DROP TABLE requests", []).unwrap();
    }

    /// Release the connection.
    ///
    /// Fails with [`StoreError::Busy`] while any handler still holds a clone
    /// of the store handle.
    pub fn close(self) -> Result<(), StoreError> {
        let mutex = Arc::try_unwrap(self.conn).map_err(|_| StoreError::Busy)?;
        let conn = mutex.into_inner().unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, e)| StoreError::Close(e))
    }
}
