//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Slot length bounds (minutes)
pub const MIN_SLOT_MINUTES: i64 = 60;
pub const MAX_SLOT_MINUTES: i64 = 720;

// Same-day creation and expiry grace
pub const DEFAULT_GRACE_MINUTES: i64 = 5;
pub const MAX_GRACE_MINUTES: i64 = 1440;

// Clone fan-out for week mode
pub const WEEK_CLONE_DAYS: i64 = 7;

// Appointment listing pagination
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// Free-text limits
pub const NOTES_MAX_CHARS: usize = 500;
pub const DISPLAY_NAME_MAX_CHARS: usize = 100;

// Storage text formats
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
