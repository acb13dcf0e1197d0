//! Expiry sweep for past-due available slots

use std::sync::Arc;

use chrono::{DateTime, Utc};
use petnco_common::Clock;
use petnco_domain::scheduling::ExpiryCutoff;
use petnco_domain::{Result, SchedulingConfig, SweepScope};
use tracing::{debug, info};

use super::ports::SlotRepository;

/// Moves available slots whose start has passed to expired
///
/// Idempotent: a second sweep with the same `now` changes nothing. Reserved,
/// cancelled and already expired slots are never touched.
pub struct ExpirationSweeper {
    slots: Arc<dyn SlotRepository>,
    clock: Arc<dyn Clock>,
    config: SchedulingConfig,
}

impl ExpirationSweeper {
    pub fn new(
        slots: Arc<dyn SlotRepository>,
        clock: Arc<dyn Clock>,
        config: SchedulingConfig,
    ) -> Self {
        Self { slots, clock, config }
    }

    /// Cutoff for `now` in the configured time zone
    pub fn cutoff(&self, now: DateTime<Utc>) -> ExpiryCutoff {
        ExpiryCutoff::new(self.config.local_now(now), self.config.grace())
    }

    /// Store-wide sweep
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<u64> {
        let expired = self.sweep_scope(SweepScope::all(), now).await?;
        info!(expired, "store-wide expiry sweep finished");
        Ok(expired)
    }

    /// Sweep limited to a vet and/or date window
    pub async fn sweep_scope(&self, scope: SweepScope, now: DateTime<Utc>) -> Result<u64> {
        let cutoff = self.cutoff(now);
        let expired = self.slots.expire_available(scope, cutoff, now).await?;
        if expired > 0 {
            debug!(
                expired,
                vet_id = ?scope.vet_id,
                today = %cutoff.today,
                "expired past-due slots"
            );
        }
        Ok(expired)
    }

    /// Scoped sweep at the injected clock's "now"
    pub async fn sweep_scope_now(&self, scope: SweepScope) -> Result<u64> {
        self.sweep_scope(scope, self.clock.now()).await
    }
}
