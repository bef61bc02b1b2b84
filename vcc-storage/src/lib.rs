//! DuckDB storage layer for the VCC survey.
//!
//! # Architecture
//!
//! - One DuckDB database holds all four tables: `companies`, `aggregates`,
//!   `individual_records` and `access_log`
//! - There is no foreign key, index or join path between `aggregates` and
//!   `individual_records`
//! - Each unit of work gets its own connection cloned from the shared
//!   [`Database`] handle and runs inside [`with_transaction`], so concurrent
//!   writers to different companies never wait on each other
//! - Schema creation is idempotent and runs on open

mod companies;
mod error;
mod schema;

pub use companies::{optional, parse_id, CompanyStore};
pub use error::{StorageError, StorageResult};
pub use schema::initialize_schema;

use duckdb::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Shared handle to the survey database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database at `path`. `":memory:"` opens an
    /// in-memory database.
    pub fn open(path: &Path, memory_limit: &str, threads: u32) -> StorageResult<Self> {
        if path.to_str() == Some(":memory:") {
            return Self::open_in_memory();
        }
        let conn = open_duckdb_with_wal_recovery(path, memory_limit, threads)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// A new connection to the same database, for one unit of work.
    pub fn connection(&self) -> StorageResult<Connection> {
        Ok(self.lock_conn().try_clone()?)
    }

    /// Acquire the primary connection, recovering from a poisoned lock.
    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            warn!("recovering from poisoned database mutex");
            poisoned.into_inner()
        })
    }
}

/// Runs `f` inside `BEGIN TRANSACTION`/`COMMIT` on `conn`.
///
/// Any error from `f` or from the commit rolls the whole transaction back, so
/// callers see either every effect of `f` or none.
pub fn with_transaction<T, E, F>(conn: &Connection, f: F) -> Result<T, E>
where
    F: FnOnce(&Connection) -> Result<T, E>,
    E: From<StorageError>,
{
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(StorageError::from)?;

    match f(conn) {
        Ok(value) => {
            if let Err(e) = conn.execute_batch("COMMIT") {
                // A failed commit may already have aborted the transaction.
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StorageError::from(e).into());
            }
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                warn!("rollback failed: {rollback_err}");
            }
            Err(e)
        }
    }
}

/// Open a DuckDB connection with stale WAL recovery and resource limits.
///
/// If the initial open fails and a `.wal` file exists alongside the database,
/// it is removed and the open is retried once.
pub fn open_duckdb_with_wal_recovery(
    path: &Path,
    memory_limit: &str,
    threads: u32,
) -> StorageResult<Connection> {
    let conn = match Connection::open(path) {
        Ok(c) => c,
        Err(first_err) => {
            let wal_path = path.with_extension(
                path.extension()
                    .map(|ext| format!("{}.wal", ext.to_string_lossy()))
                    .unwrap_or_else(|| "wal".to_string()),
            );
            if wal_path.exists() {
                warn!(
                    "DuckDB open failed, removing stale WAL and retrying: {}",
                    wal_path.display()
                );
                if std::fs::remove_file(&wal_path).is_ok() {
                    let c = Connection::open(path)?;
                    apply_resource_limits(&c, memory_limit, threads)?;
                    return Ok(c);
                }
            }
            return Err(first_err.into());
        }
    };
    apply_resource_limits(&conn, memory_limit, threads)?;
    Ok(conn)
}

/// Apply memory and thread limits to a DuckDB connection.
fn apply_resource_limits(conn: &Connection, memory_limit: &str, threads: u32) -> StorageResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA memory_limit='{}'; PRAGMA threads={};",
        memory_limit, threads
    ))?;
    Ok(())
}
