//! # Petnco API
//!
//! Application layer - commands, HTTP surface and main entry point.
//!
//! This crate contains:
//! - Commands wrapping the core services with logging and notifications
//! - The axum router and its handlers
//! - Application context (dependency injection)
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Reads caller identity from headers set by the identity provider

pub mod commands;
pub mod context;
pub mod http;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use http::router;
