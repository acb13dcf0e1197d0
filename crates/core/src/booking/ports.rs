//! Port interfaces for booking persistence and notification

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use petnco_domain::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, BookingNotice, Page,
    PageRequest, Result, SlotStatus,
};

/// Atomic slot/appointment transitions
///
/// Every method is one unit of work guarded by a conditional update on the
/// current status, so concurrent callers resolve to exactly one winner.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Set the appointment's slot from available to reserved and insert the
    /// appointment with its services
    ///
    /// Fails with `Conflict` if the slot is no longer available.
    async fn reserve(&self, appointment: &Appointment) -> Result<()>;

    /// Cancel a pending or confirmed appointment and move its reserved slot
    /// (if it still exists) to `release_to`
    ///
    /// Fails with `InvalidState` if the appointment is no longer open.
    async fn cancel(
        &self,
        id: AppointmentId,
        release_to: SlotStatus,
        now: DateTime<Utc>,
    ) -> Result<Appointment>;

    /// Compare-and-set the appointment status
    ///
    /// Fails with `InvalidState` if the current status is not `from`.
    async fn transition(
        &self,
        id: AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> Result<Appointment>;
}

/// Read-only appointment access
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>>;

    /// Filtered page ordered by date then start, direction per
    /// `filter.order`
    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>>;
}

/// Outbound notification after a successful reserve or cancel
///
/// Delivery outcome never changes the booking result.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn notify(&self, notice: &BookingNotice) -> Result<()>;
}
