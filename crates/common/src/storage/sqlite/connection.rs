//! SQLite connection wrapper
//!
//! Wraps a pooled rusqlite connection. The connection goes back to the pool
//! when dropped.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection as RusqliteConnection, Params, Row, Transaction, TransactionBehavior};
use tracing::instrument;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::metrics::StorageMetrics;

/// Pooled SQLite connection
///
/// Derefs to [`rusqlite::Connection`] for anything the wrapper does not
/// cover. Statements run through [`SqliteConnection::execute`] and
/// [`SqliteConnection::query_row`] are counted in the pool metrics.
pub struct SqliteConnection {
    inner: PooledConnection<SqliteConnectionManager>,
    metrics: Arc<StorageMetrics>,
}

impl SqliteConnection {
    /// Create a new connection wrapper from a pooled connection
    pub fn new(conn: PooledConnection<SqliteConnectionManager>, metrics: Arc<StorageMetrics>) -> Self {
        Self { inner: conn, metrics }
    }

    /// Execute a statement that doesn't return rows
    #[instrument(skip(self, params), fields(sql = %sql))]
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> StorageResult<usize> {
        let result = self.inner.execute(sql, params);
        self.metrics.record_query(result.is_ok());
        result.map_err(StorageError::from)
    }

    /// Execute a query that returns a single row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_row<T, P, F>(&self, sql: &str, params: P, f: F) -> StorageResult<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        let result = self.inner.query_row(sql, params, f);
        self.metrics.record_query(result.is_ok());
        result.map_err(StorageError::from)
    }

    /// Begin a write transaction that takes the RESERVED lock up front
    ///
    /// Read-check-write sequences inside the transaction cannot interleave
    /// with another writer.
    #[instrument(skip(self))]
    pub fn immediate_transaction(&mut self) -> StorageResult<Transaction<'_>> {
        self.inner
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)
    }
}

impl Deref for SqliteConnection {
    type Target = RusqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SqliteConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
