use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle the router and its host both hold.
pub type SharedMetrics = Rc<RefCell<RouterMetrics>>;

/// Dispatch counters accumulated by `AppRouter`.
#[derive(Debug, Default, Clone)]
pub struct RouterMetrics {
    registrations: u64,
    replacements: u64,
    routes_resolved: u64,
    route_misses: u64,
    transitions: u64,
    noop_transitions: u64,
    unresolved_sources: u64,
    section_changes: u64,
    decode_failures: u64,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedMetrics {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn record_registration(&mut self, replaced: bool) {
        self.registrations = self.registrations.saturating_add(1);
        if replaced {
            self.replacements = self.replacements.saturating_add(1);
        }
    }

    pub fn record_route(&mut self, resolved: bool) {
        if resolved {
            self.routes_resolved = self.routes_resolved.saturating_add(1);
        } else {
            self.route_misses = self.route_misses.saturating_add(1);
        }
    }

    pub fn record_transition(&mut self, applied: bool) {
        if applied {
            self.transitions = self.transitions.saturating_add(1);
        } else {
            self.noop_transitions = self.noop_transitions.saturating_add(1);
        }
    }

    pub fn record_unresolved_source(&mut self) {
        self.unresolved_sources = self.unresolved_sources.saturating_add(1);
    }

    pub fn record_section_change(&mut self) {
        self.section_changes = self.section_changes.saturating_add(1);
    }

    pub fn record_decode_failure(&mut self) {
        self.decode_failures = self.decode_failures.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            registrations: self.registrations,
            replacements: self.replacements,
            routes_resolved: self.routes_resolved,
            route_misses: self.route_misses,
            transitions: self.transitions,
            noop_transitions: self.noop_transitions,
            unresolved_sources: self.unresolved_sources,
            section_changes: self.section_changes,
            decode_failures: self.decode_failures,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub registrations: u64,
    pub replacements: u64,
    pub routes_resolved: u64,
    pub route_misses: u64,
    pub transitions: u64,
    pub noop_transitions: u64,
    pub unresolved_sources: u64,
    pub section_changes: u64,
    pub decode_failures: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "router_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("registrations".to_string(), json!(self.registrations));
        map.insert("replacements".to_string(), json!(self.replacements));
        map.insert("routes_resolved".to_string(), json!(self.routes_resolved));
        map.insert("route_misses".to_string(), json!(self.route_misses));
        map.insert("transitions".to_string(), json!(self.transitions));
        map.insert("noop_transitions".to_string(), json!(self.noop_transitions));
        map.insert(
            "unresolved_sources".to_string(),
            json!(self.unresolved_sources),
        );
        map.insert("section_changes".to_string(), json!(self.section_changes));
        map.insert("decode_failures".to_string(), json!(self.decode_failures));
        map
    }
}
