//! Pure scheduling rules
//!
//! Interval math, slot validation, expiry cutoffs and clone target dates.
//! Nothing here reads a clock; callers pass "now" in.

pub mod clone;
pub mod expiry;
pub mod interval;
pub mod validation;

pub use clone::clone_targets;
pub use expiry::ExpiryCutoff;
pub use interval::TimeInterval;
pub use validation::{validate_interval, validate_new_slot, validate_notes};
