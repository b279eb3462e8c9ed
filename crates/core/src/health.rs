//! Health Check Module
//!
//! Pluggable health checks polled by a periodic scheduler and rendered as a
//! single report. A check never terminates the process: failures become an
//! [`HealthStatus::Unhealthy`] entry in the report and a warning in the log.
//!
//! Each run moves every registered check from pending to a terminal
//! healthy/unhealthy status. There is no retry inside a run; the next tick
//! of the scheduler is the retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Outcome of a single health check invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy { reason: String },
}

impl HealthStatus {
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self::Unhealthy {
            reason: reason.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// A named check that the scheduler invokes periodically.
///
/// Implementations must be stateless across invocations: each call is an
/// independent probe.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> HealthStatus;
}

/// Result of running every registered check once
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthReport {
    /// Generation timestamp (Unix milliseconds)
    pub timestamp: u64,

    /// Status per check name
    pub checks: BTreeMap<String, HealthStatus>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.checks.values().all(HealthStatus::is_healthy)
    }

    pub fn unhealthy(&self) -> impl Iterator<Item = (&str, &str)> {
        self.checks.iter().filter_map(|(name, status)| match status {
            HealthStatus::Unhealthy { reason } => Some((name.as_str(), reason.as_str())),
            HealthStatus::Healthy => None,
        })
    }
}

/// Bound on a single check when none is configured
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Registration point for health checks
#[derive(Clone)]
pub struct HealthRegistry {
    checks: Vec<Arc<dyn HealthCheck>>,
    timeout: Duration,
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_CHECK_TIMEOUT)
    }
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose checks are cut off after `timeout` and reported
    /// unhealthy.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            checks: Vec::new(),
            timeout,
        }
    }

    pub fn register(&mut self, check: Arc<dyn HealthCheck>) {
        debug!(check = check.name(), "Registered health check");
        self.checks.push(check);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check sequentially and collect the results. A check that
    /// does not finish within the registry timeout is unhealthy.
    pub async fn run_all(&self) -> HealthReport {
        let mut checks = BTreeMap::new();
        for check in &self.checks {
            let status = match tokio::time::timeout(self.timeout, check.check()).await {
                Ok(status) => status,
                Err(_) => HealthStatus::unhealthy(format!(
                    "Health check timed out after {}ms",
                    self.timeout.as_millis()
                )),
            };
            if let HealthStatus::Unhealthy { reason } = &status {
                warn!(check = check.name(), reason = %reason, "Health check unhealthy");
            }
            checks.insert(check.name().to_string(), status);
        }

        HealthReport {
            timestamp: current_timestamp_ms(),
            checks,
        }
    }
}

/// Latest report shared between the scheduler and its readers
pub type SharedHealthReport = Arc<RwLock<Option<HealthReport>>>;

/// Periodic poller for a [`HealthRegistry`]
pub struct HealthScheduler {
    registry: Arc<HealthRegistry>,
    interval: Duration,
    latest: SharedHealthReport,
}

impl HealthScheduler {
    pub fn new(registry: Arc<HealthRegistry>, interval: Duration) -> Self {
        Self {
            registry,
            interval,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Handle to the most recent report (None until the first run completes)
    pub fn latest(&self) -> SharedHealthReport {
        Arc::clone(&self.latest)
    }

    /// Run the registry once and publish the report.
    pub async fn run_once(&self) -> HealthReport {
        let report = self.registry.run_all().await;
        *self.latest.write().await = Some(report.clone());
        report
    }

    /// Start polling on the current tokio runtime. The first run happens
    /// immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = self.run_once().await;
                debug!(
                    checks = report.checks.len(),
                    healthy = report.all_healthy(),
                    "Health checks complete"
                );
            }
        })
    }
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
