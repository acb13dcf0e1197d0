//! Storage primitives for SQLite databases
//!
//! Pooled rusqlite connections with per-connection pragmas, storage errors,
//! and lightweight metrics. Schema management belongs to the application.

pub mod error;
pub mod metrics;
pub mod sqlite;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use metrics::StorageMetrics;
pub use sqlite::{apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig};
pub use types::{HealthStatus, PoolMetrics};
