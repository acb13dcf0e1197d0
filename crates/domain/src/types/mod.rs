//! Domain types and models

pub mod appointment;
pub mod catalog;
pub mod identity;
pub mod ids;
pub mod slot;
pub mod vet;

pub use appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, BookingNotice, NoticeKind, Page,
    PageRequest, SortOrder,
};
pub use catalog::{BookableService, PersonalizedService, Service};
pub use identity::Actor;
pub use ids::{AppointmentId, ServiceId, SlotId, UserId, VetId};
pub use slot::{
    CloneMode, CloneOutcome, DeleteOutcome, ItemFailure, SlotChanges, SlotStatus, SweepScope,
    TimeSlot,
};
pub use vet::VeterinarianProfile;
