//! Navigation audit hooks.
//!
//! Records capture a stage identifier plus structured metadata so callers can
//! log, buffer or assert on what the router did without reaching into it.

use std::cell::RefCell;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by `AppRouter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAuditStage {
    /// A router instance was constructed.
    RouterConstructed,
    /// A handler was registered under a fresh identifier.
    RouteRegistered,
    /// A handler replaced an earlier registration.
    RouteReplaced,
    /// An identifier resolved to a handler which was started.
    RouteDispatched,
    /// No handler is registered for the identifier.
    RouteMissed,
    /// No effective source could be found for a transition.
    SourceUnresolved,
    /// A transition changed the hierarchy.
    TransitionApplied,
    /// A transition was requested but left the hierarchy untouched.
    TransitionSkipped,
    /// A section was selected.
    SectionOpened,
    /// A section index was out of range.
    SectionRejected,
}

impl NavigationAuditStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RouterConstructed => "router_constructed",
            Self::RouteRegistered => "route_registered",
            Self::RouteReplaced => "route_replaced",
            Self::RouteDispatched => "route_dispatched",
            Self::RouteMissed => "route_missed",
            Self::SourceUnresolved => "source_unresolved",
            Self::TransitionApplied => "transition_applied",
            Self::TransitionSkipped => "transition_skipped",
            Self::SectionOpened => "section_opened",
            Self::SectionRejected => "section_rejected",
        }
    }
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct NavigationAuditEvent {
    pub timestamp: SystemTime,
    pub stage: NavigationAuditStage,
    pub details: Vec<(String, Value)>,
}

impl NavigationAuditEvent {
    fn new(stage: NavigationAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct NavigationAuditEventBuilder {
    event: NavigationAuditEvent,
}

impl NavigationAuditEventBuilder {
    pub fn new(stage: NavigationAuditStage) -> Self {
        Self {
            event: NavigationAuditEvent::new(stage),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> NavigationAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait NavigationAudit {
    fn record(&self, event: NavigationAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullNavigationAudit;

impl NavigationAudit for NullNavigationAudit {
    fn record(&self, _event: NavigationAuditEvent) {}
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct BufferedNavigationAudit {
    events: RefCell<Vec<NavigationAuditEvent>>,
}

impl BufferedNavigationAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationAuditEvent> {
        self.events.borrow().clone()
    }

    pub fn stages(&self) -> Vec<NavigationAuditStage> {
        self.events.borrow().iter().map(|event| event.stage).collect()
    }

    pub fn count(&self, stage: NavigationAuditStage) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.stage == stage)
            .count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl NavigationAudit for BufferedNavigationAudit {
    fn record(&self, event: NavigationAuditEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_audit_keeps_order_and_details() {
        let audit = BufferedNavigationAudit::new();
        let mut builder = NavigationAuditEventBuilder::new(NavigationAuditStage::RouteDispatched);
        builder.detail("screen", "home").detail("operation", "open_root");
        audit.record(builder.finish());
        audit.record(NavigationAuditEventBuilder::new(NavigationAuditStage::RouteMissed).finish());

        assert_eq!(
            audit.stages(),
            vec![
                NavigationAuditStage::RouteDispatched,
                NavigationAuditStage::RouteMissed
            ]
        );
        let events = audit.events();
        let first = &events[0];
        assert_eq!(first.detail("screen"), Some(&Value::from("home")));
        assert_eq!(audit.count(NavigationAuditStage::RouteMissed), 1);
        audit.clear();
        assert!(audit.events().is_empty());
    }
}
