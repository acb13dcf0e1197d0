//! Overlap detection between slots of the same vet and date

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use petnco_domain::scheduling::TimeInterval;
use petnco_domain::{PetncoError, Result, SlotId, TimeSlot, VetId};

use super::ports::SlotRepository;

/// First active slot in `slots` for the vet and date that overlaps
/// `interval`, skipping `exclude`
pub fn find_conflict<'a>(
    slots: &'a [TimeSlot],
    vet_id: VetId,
    date: NaiveDate,
    interval: &TimeInterval,
    exclude: Option<SlotId>,
) -> Option<&'a TimeSlot> {
    slots.iter().find(|slot| {
        slot.vet_id == vet_id
            && slot.date == date
            && slot.is_active()
            && Some(slot.id) != exclude
            && slot.interval().overlaps(interval)
    })
}

/// Loads a vet's day through [`SlotRepository`] and runs [`find_conflict`]
#[derive(Clone)]
pub struct ConflictDetector {
    slots: Arc<dyn SlotRepository>,
}

impl ConflictDetector {
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    pub async fn has_conflict(
        &self,
        vet_id: VetId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<SlotId>,
    ) -> Result<bool> {
        let interval = TimeInterval::new(start, end)
            .ok_or_else(|| PetncoError::validation("end", "must be after start"))?;
        self.conflicting_slot(vet_id, date, &interval, exclude).await.map(|slot| slot.is_some())
    }

    /// `Err(Conflict)` naming the clashing slot, if any
    pub async fn ensure_free(
        &self,
        vet_id: VetId,
        date: NaiveDate,
        interval: &TimeInterval,
        exclude: Option<SlotId>,
    ) -> Result<()> {
        match self.conflicting_slot(vet_id, date, interval, exclude).await? {
            Some(existing) => Err(PetncoError::Conflict(format!(
                "{interval} on {date} overlaps slot {} ({})",
                existing.id,
                existing.interval()
            ))),
            None => Ok(()),
        }
    }

    async fn conflicting_slot(
        &self,
        vet_id: VetId,
        date: NaiveDate,
        interval: &TimeInterval,
        exclude: Option<SlotId>,
    ) -> Result<Option<TimeSlot>> {
        let day = self.slots.active_slots_on(vet_id, date).await?;
        Ok(find_conflict(&day, vet_id, date, interval, exclude).cloned())
    }
}
