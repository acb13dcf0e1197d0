//! Slot scheduling
//!
//! Conflict detection, the slot lifecycle and the expiry sweep.

pub mod conflict;
pub mod ports;
pub mod slot_store;
pub mod sweeper;

pub use conflict::{find_conflict, ConflictDetector};
pub use ports::SlotRepository;
pub use slot_store::SlotStore;
pub use sweeper::ExpirationSweeper;
