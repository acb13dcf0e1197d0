//! Command layer
//!
//! Thin wrappers over the core services. Each command logs its outcome and
//! duration; booking commands also hand a notice to the notifier.

pub mod appointments;
pub mod catalog;
pub mod maintenance;
pub mod slots;
