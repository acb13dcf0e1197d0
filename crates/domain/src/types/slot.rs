//! Time slot types

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{SlotId, VetId};
use crate::errors::{ErrorKind, PetncoError};
use crate::scheduling::TimeInterval;

/// Lifecycle of a slot
///
/// `expired` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Reserved,
    Expired,
    Cancelled,
}

crate::impl_domain_status_conversions!(SlotStatus {
    Available => "available",
    Reserved => "reserved",
    Expired => "expired",
    Cancelled => "cancelled",
});

impl SlotStatus {
    /// Statuses that occupy the vet's calendar and take part in overlap
    /// checks
    pub const ACTIVE: [SlotStatus; 2] = [SlotStatus::Available, SlotStatus::Reserved];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }
}

/// A bookable interval on one date for one veterinarian
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub vet_id: VetId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::unchecked(self.start, self.end)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Partial edit of a slot's date or times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChanges {
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl SlotChanges {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.start.is_none() && self.end.is_none()
    }

    /// Resulting (date, start, end) once applied to `slot`
    pub fn applied_to(&self, slot: &TimeSlot) -> (NaiveDate, NaiveTime, NaiveTime) {
        (
            self.date.unwrap_or(slot.date),
            self.start.unwrap_or(slot.start),
            self.end.unwrap_or(slot.end),
        )
    }
}

/// How a slot is copied onto other dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneMode {
    /// The day after the source date
    NextDay,
    /// Each of the seven days after the source date
    Week,
    /// One explicitly given date
    Specific,
}

crate::impl_domain_status_conversions!(CloneMode {
    NextDay => "next_day",
    Week => "week",
    Specific => "specific",
});

/// Why one item of a batch operation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl From<&PetncoError> for ItemFailure {
    fn from(err: &PetncoError) -> Self {
        Self {
            kind: err.kind(),
            field: err.field().map(str::to_owned),
            message: err.detail().to_owned(),
        }
    }
}

impl From<PetncoError> for ItemFailure {
    fn from(err: PetncoError) -> Self {
        Self::from(&err)
    }
}

/// Per-date result of a clone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOutcome {
    pub date: NaiveDate,
    pub result: Result<SlotId, ItemFailure>,
}

impl CloneOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-slot result of clearing a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub slot_id: SlotId,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub result: Result<(), ItemFailure>,
}

/// Window an expiry sweep is limited to
///
/// `None` bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepScope {
    pub vet_id: Option<VetId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SweepScope {
    /// Every slot in the store
    pub fn all() -> Self {
        Self::default()
    }

    pub fn vet_window(vet_id: VetId, from: NaiveDate, to: NaiveDate) -> Self {
        Self { vet_id: Some(vet_id), from: Some(from), to: Some(to) }
    }

    pub fn vet_day(vet_id: VetId, date: NaiveDate) -> Self {
        Self::vet_window(vet_id, date, date)
    }

    pub fn contains(&self, vet_id: VetId, date: NaiveDate) -> bool {
        self.vet_id.map_or(true, |v| v == vet_id)
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}
