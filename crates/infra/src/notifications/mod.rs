//! Booking notification adapters

use async_trait::async_trait;
use petnco_core::booking::ports::BookingNotifier;
use petnco_domain::{BookingNotice, Result};
use tracing::info;

/// Notifier that records each notice as a structured log event
///
/// Stands in for mail or push delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn notify(&self, notice: &BookingNotice) -> Result<()> {
        info!(
            kind = ?notice.kind,
            appointment_id = %notice.appointment_id,
            user_id = %notice.user_id,
            vet_id = %notice.vet_id,
            date = %notice.date,
            start = %notice.start,
            end = %notice.end,
            "booking notice"
        );
        Ok(())
    }
}
