//! Health report for the running service
//!
//! A report is a list of component checks plus a score; the service counts
//! as healthy while at least 80% of its components are.

use chrono::{DateTime, Utc};
use petnco_common::storage::PoolMetrics;
use serde::{Deserialize, Serialize};

const HEALTHY_THRESHOLD: f64 = 0.8;

/// Overall health status of the application
///
/// # Example
/// ```
/// use chrono::Utc;
/// use petnco_api::utils::health::{ComponentHealth, HealthStatus};
///
/// let mut status = HealthStatus::new(Utc::now())
///     .add_component(ComponentHealth::healthy("database"))
///     .add_component(ComponentHealth::unhealthy("connection_pool", "exhausted"));
/// status.calculate_score();
///
/// assert_eq!(status.score, 0.5);
/// assert!(!status.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub is_healthy: bool,

    /// healthy_components / total_components
    pub score: f64,

    pub message: Option<String>,

    pub components: Vec<ComponentHealth>,

    /// Connection pool counters since startup
    pub pool: Option<PoolUsage>,

    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    /// Healthy report with no components yet
    pub fn new(checked_at: DateTime<Utc>) -> Self {
        Self {
            is_healthy: true,
            score: 1.0,
            message: None,
            components: Vec::new(),
            pool: None,
            checked_at,
        }
    }

    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_pool_usage(mut self, metrics: &PoolMetrics) -> Self {
        self.pool = Some(PoolUsage::from(metrics));
        self
    }

    /// Recompute score and verdict; call after the last component is added
    pub fn calculate_score(&mut self) {
        if self.components.is_empty() {
            return;
        }

        let healthy = self.components.iter().filter(|c| c.is_healthy).count();
        #[allow(clippy::cast_precision_loss)]
        let score = healthy as f64 / self.components.len() as f64;

        self.score = score;
        self.is_healthy = score >= HEALTHY_THRESHOLD;
        if !self.is_healthy {
            self.message = Some(format!("{healthy} of {} components healthy", self.components.len()));
        }
    }
}

/// Serializable view of the storage pool counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolUsage {
    pub connections_acquired: u64,
    pub connections_timeout: u64,
    pub connections_error: u64,
    pub avg_acquisition_time_ms: u64,
}

impl From<&PoolMetrics> for PoolUsage {
    fn from(metrics: &PoolMetrics) -> Self {
        Self {
            connections_acquired: metrics.connections_acquired,
            connections_timeout: metrics.connections_timeout,
            connections_error: metrics.connections_error,
            avg_acquisition_time_ms: metrics.avg_acquisition_time_ms,
        }
    }
}

/// Health of one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
