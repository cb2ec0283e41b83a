//! Router configuration, audit hooks, bootstrap and drivers.

use std::rc::Rc;

use crate::logging::Logger;
use crate::metrics::{RouterMetrics, SharedMetrics};

pub mod audit;
pub mod bootstrap;
pub mod driver;

use self::audit::{NavigationAudit, NullNavigationAudit};

/// Configuration knobs for `AppRouter`.
#[derive(Clone)]
pub struct RouterConfig {
    /// Optional structured logger used by the router.
    pub logger: Option<Logger>,
    /// Dispatch counters shared with the host.
    pub metrics: Option<SharedMetrics>,
    /// Sink for navigation audit events.
    pub audit: Rc<dyn NavigationAudit>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            audit: Rc::new(NullNavigationAudit),
            metrics_target: "router::metrics".to_string(),
        }
    }
}

impl RouterConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Rc<dyn NavigationAudit>) -> Self {
        self.audit = audit;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(RouterMetrics::shared());
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<SharedMetrics> {
        self.metrics.as_ref().map(Rc::clone)
    }
}
