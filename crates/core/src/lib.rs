//! # Petnco Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for slots, appointments and the catalog
//! - Scheduling services (conflict detection, slot lifecycle, expiry sweep)
//! - Booking services (reservation, cancellation, appointment queries)
//!
//! ## Architecture Principles
//! - Only depends on `petnco-common` and `petnco-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - "Now" always comes from an injected [`petnco_common::Clock`]

pub mod booking;
pub mod catalog;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use booking::ports::{AppointmentRepository, BookingNotifier, BookingStore};
pub use booking::{AppointmentQueries, BookingService};
pub use catalog::ports::{ServiceCatalog, VetDirectory};
pub use catalog::CatalogService;
pub use scheduling::ports::SlotRepository;
pub use scheduling::{ConflictDetector, ExpirationSweeper, SlotStore};
