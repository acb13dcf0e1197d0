//! Database implementations

pub mod booking_repository;
pub mod catalog_repository;
mod columns;
pub mod manager;
pub mod slot_repository;

pub use booking_repository::SqliteBookingRepository;
pub use catalog_repository::SqliteCatalogRepository;
pub use manager::{DbManager, SCHEMA_VERSION};
pub use slot_repository::SqliteSlotRepository;
