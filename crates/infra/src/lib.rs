//! # Petnco Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for slots, appointments and the catalog
//! - Schema migrations and the connection manager
//! - Configuration loading from the environment or files
//! - A log-based booking notifier
//!
//! ## Architecture
//! - Implements traits defined in `petnco-core`
//! - Depends on `petnco-common`, `petnco-domain` and `petnco-core`
//! - Contains all "impure" code (I/O)

pub mod config;
pub mod database;
pub mod errors;
pub mod notifications;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use notifications::LogNotifier;
