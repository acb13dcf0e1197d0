//! Target dates for slot cloning

use chrono::{Duration, NaiveDate};

use crate::constants::WEEK_CLONE_DAYS;
use crate::errors::{PetncoError, Result};
use crate::types::CloneMode;

/// Dates a slot on `source` is copied to
///
/// `target` is required for [`CloneMode::Specific`] and ignored otherwise.
pub fn clone_targets(
    source: NaiveDate,
    mode: CloneMode,
    target: Option<NaiveDate>,
) -> Result<Vec<NaiveDate>> {
    match mode {
        CloneMode::NextDay => Ok(vec![shift(source, 1)?]),
        CloneMode::Week => (1..=WEEK_CLONE_DAYS).map(|days| shift(source, days)).collect(),
        CloneMode::Specific => target
            .map(|date| vec![date])
            .ok_or_else(|| PetncoError::validation("target_date", "required for specific mode")),
    }
}

fn shift(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| PetncoError::validation("date", "out of calendar range"))
}
