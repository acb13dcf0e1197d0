//! Slot and booking validation
//!
//! Runs before anything is persisted. Every failure is a
//! [`PetncoError::Validation`] naming the offending field.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::interval::TimeInterval;
use crate::constants::{MAX_SLOT_MINUTES, MIN_SLOT_MINUTES, NOTES_MAX_CHARS};
use crate::errors::{PetncoError, Result};

/// Checks minute precision, ordering and the duration bounds
pub fn validate_interval(start: NaiveTime, end: NaiveTime) -> Result<TimeInterval> {
    for (field, time) in [("start", start), ("end", end)] {
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(PetncoError::validation(field, "must be a whole minute"));
        }
    }

    let interval = TimeInterval::new(start, end)
        .ok_or_else(|| PetncoError::validation("end", "must be after start"))?;

    let minutes = interval.duration_minutes();
    if minutes < MIN_SLOT_MINUTES {
        return Err(PetncoError::validation(
            "end",
            format!("slot must last at least {MIN_SLOT_MINUTES} minutes (got {minutes})"),
        ));
    }
    if minutes > MAX_SLOT_MINUTES {
        return Err(PetncoError::validation(
            "end",
            format!("slot must last at most {MAX_SLOT_MINUTES} minutes (got {minutes})"),
        ));
    }

    Ok(interval)
}

/// Full check for a slot about to be created or moved
///
/// `now_local` is the clinic's wall clock. A slot dated today must start
/// strictly later than `now_local + grace`.
pub fn validate_new_slot(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    now_local: NaiveDateTime,
    grace: Duration,
) -> Result<TimeInterval> {
    let interval = validate_interval(start, end)?;
    let today = now_local.date();

    if date < today {
        return Err(PetncoError::validation("date", format!("{date} is in the past")));
    }

    if date == today {
        let earliest = now_local + grace;
        if date.and_time(start) <= earliest {
            return Err(PetncoError::validation(
                "start",
                format!("must be later than {} today", earliest.format("%H:%M")),
            ));
        }
    }

    Ok(interval)
}

pub fn validate_notes(notes: &str) -> Result<()> {
    let chars = notes.chars().count();
    if chars > NOTES_MAX_CHARS {
        return Err(PetncoError::validation(
            "notes",
            format!("must be at most {NOTES_MAX_CHARS} characters (got {chars})"),
        ));
    }
    Ok(())
}
