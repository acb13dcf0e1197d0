//! Port interfaces for slot persistence
//!
//! Adapters must make the writes below atomic with respect to each other:
//! the overlap re-check on insert/update and every status compare-and-set
//! run inside a single store transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use petnco_domain::scheduling::ExpiryCutoff;
use petnco_domain::{Result, SlotId, SlotStatus, SweepScope, TimeSlot, VetId};

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert a new slot
    ///
    /// Fails with `Conflict` if an active slot of the same vet and date
    /// overlaps it at commit time.
    async fn insert_slot(&self, slot: &TimeSlot) -> Result<()>;

    async fn get_slot(&self, id: SlotId) -> Result<Option<TimeSlot>>;

    /// Persist new date/start/end for an available slot
    ///
    /// Fails with `Conflict` on overlap (ignoring the slot itself) and with
    /// `InvalidState` if the slot is no longer available.
    async fn update_slot_times(&self, slot: &TimeSlot) -> Result<()>;

    /// Delete a slot that is not reserved
    ///
    /// Appointments that referenced it keep their snapshot and lose the
    /// reference. Fails with `InvalidState` if the slot is reserved.
    async fn delete_slot(&self, id: SlotId) -> Result<()>;

    /// Available and reserved slots of one vet on one date
    async fn active_slots_on(&self, vet_id: VetId, date: NaiveDate) -> Result<Vec<TimeSlot>>;

    /// Slots of one vet between two dates inclusive, ordered by date then
    /// start, optionally limited to one status
    async fn slots_in_range(
        &self,
        vet_id: VetId,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<SlotStatus>,
    ) -> Result<Vec<TimeSlot>>;

    /// Move available slots inside `scope` that are past `cutoff` to expired
    ///
    /// Returns how many slots changed.
    async fn expire_available(
        &self,
        scope: SweepScope,
        cutoff: ExpiryCutoff,
        now: DateTime<Utc>,
    ) -> Result<u64>;

    /// Compare-and-set available -> cancelled
    ///
    /// Returns `false` if the slot was not available.
    async fn withdraw_slot(&self, id: SlotId, now: DateTime<Utc>) -> Result<bool>;
}
