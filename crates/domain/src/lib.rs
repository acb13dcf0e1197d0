//! # Petnco Domain
//!
//! Business domain types and models for veterinary scheduling.
//!
//! This crate contains:
//! - Domain data types (TimeSlot, Appointment, VeterinarianProfile, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Pure scheduling rules (interval math, slot validation, expiry cutoffs)
//!
//! ## Architecture
//! - No dependencies on other Petnco crates
//! - No I/O; every function here is deterministic given its inputs

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod scheduling;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
