//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use petnco_common::storage::{
    HealthStatus, SqliteConnection, SqlitePool, SqlitePoolConfig, StorageError,
};
use petnco_domain::{DatabaseConfig, PetncoError, Result};
use rusqlite::params;
use tokio::task;
use tracing::{info, warn};

use crate::errors::InfraError;

pub const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Create a new manager with the given pool size and busy timeout.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32, busy_timeout_ms: u64) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        let config = SqlitePoolConfig {
            max_size: pool_size.max(1),
            busy_timeout: Duration::from_millis(busy_timeout_ms),
            ..SqlitePoolConfig::default()
        };

        let pool = SqlitePool::new(&path, config).map_err(InfraError::from)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.config().max_size,
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.path, config.pool_size, config.busy_timeout_ms)
    }

    /// Borrow the underlying SQLite pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        Ok(self.pool.get_connection().map_err(InfraError::from)?)
    }

    /// Ensure the full schema exists on the current database.
    ///
    /// Refuses to run against a database written by a newer schema.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn).map_err(PetncoError::from)
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify the database answers a trivial query and report pool state.
    pub fn health_check(&self) -> Result<HealthStatus> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(InfraError::from)?;
        drop(conn);
        Ok(self.pool.health_check())
    }

    /// Run `work` on a pooled connection inside `spawn_blocking`.
    pub async fn blocking<T, F>(self: &Arc<Self>, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, InfraError> + Send + 'static,
    {
        let db = Arc::clone(self);
        task::spawn_blocking(move || -> std::result::Result<T, InfraError> {
            let mut conn = db.pool.get_connection()?;
            work(&mut conn)
        })
        .await
        .map_err(InfraError::from)?
        .map_err(PetncoError::from)
    }
}

fn create_schema(conn: &SqliteConnection) -> std::result::Result<(), InfraError> {
    let has_version_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        params![],
        |row| row.get(0),
    )?;

    if has_version_table {
        let found: Option<i32> =
            conn.query_row("SELECT MAX(version) FROM schema_version", params![], |row| row.get(0))?;
        if let Some(found) = found.filter(|found| *found > SCHEMA_VERSION) {
            warn!(expected = SCHEMA_VERSION, found, "database schema is newer than this build");
            return Err(InfraError::from(StorageError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            }));
        }
    }

    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )?;
    Ok(())
}
