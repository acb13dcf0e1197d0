//! Expiry cutoff for available slots
//!
//! A slot expires once its date is before today, or it is dated today and
//! started more than the grace period ago. When `now - grace` falls on the
//! previous day nothing dated today has expired yet.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Resolved "now" for one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryCutoff {
    pub today: NaiveDate,
    /// Slots dated `today` starting strictly before this have expired
    pub cutoff_time: Option<NaiveTime>,
}

impl ExpiryCutoff {
    pub fn new(now_local: NaiveDateTime, grace: Duration) -> Self {
        let today = now_local.date();
        let threshold = now_local - grace;
        let cutoff_time = (threshold.date() == today).then(|| threshold.time());
        Self { today, cutoff_time }
    }

    pub fn is_expired(&self, date: NaiveDate, start: NaiveTime) -> bool {
        date < self.today
            || (date == self.today && self.cutoff_time.is_some_and(|cutoff| start < cutoff))
    }
}
