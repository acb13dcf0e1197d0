//! Time sources
//!
//! Everything that compares against "now" takes a [`Clock`] so tests can pin
//! the wall clock.

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
