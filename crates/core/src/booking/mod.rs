//! Appointment booking
//!
//! [`BookingService`] is the only writer of slot/appointment status
//! pairings; [`AppointmentQueries`] is the read side.

pub mod ports;
pub mod queries;
pub mod service;

pub use ports::{AppointmentRepository, BookingNotifier, BookingStore};
pub use queries::AppointmentQueries;
pub use service::BookingService;
