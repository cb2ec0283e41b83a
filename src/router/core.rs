use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::identifier::{ScreenIdentifier, Section};
use crate::logging::{
    DISPATCH_TARGET, LogLevel, REGISTRY_TARGET, TRANSITION_TARGET, event_with_fields, json_kv,
    json_str,
};
use crate::metrics::{MetricSnapshot, RouterMetrics};
use crate::navigation::{CloseOperation, Completion, NavigationOperation, OpenOperation};
use crate::presentation::NodeRef;
use crate::routes::Route;
use crate::runtime::RouterConfig;
use crate::runtime::audit::{NavigationAuditEventBuilder, NavigationAuditStage};

/// Resolves screen identifiers to registered handlers and performs the
/// transitions those handlers ask for.
///
/// The router owns the section container and every handler. Handlers hold
/// the router weakly, so build it through [`AppRouter::new`] and keep the
/// returned `Rc` alive for as long as navigation should work.
pub struct AppRouter {
    registry: RefCell<HashMap<ScreenIdentifier, Rc<dyn Route>>>,
    sections: NodeRef,
    config: RouterConfig,
}

impl AppRouter {
    pub fn new(sections: NodeRef, config: RouterConfig) -> Rc<Self> {
        let router = Rc::new(Self {
            registry: RefCell::new(HashMap::new()),
            sections,
            config,
        });
        let section_count = router.sections.children().len();
        router.log(
            LogLevel::Info,
            DISPATCH_TARGET,
            "router_constructed",
            [json_kv("sections", section_count)],
        );
        router.audit(NavigationAuditStage::RouterConstructed, |builder| {
            builder.detail("sections", section_count);
        });
        router
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a handler for an identifier. Payloads are ignored; a second
    /// registration for the same tag replaces the first.
    pub fn register_route(&self, identifier: ScreenIdentifier, handler: Rc<dyn Route>) {
        let key = identifier.canonical();
        let tag = key.tag();
        let name = handler.name().to_string();
        let replaced = self.registry.borrow_mut().insert(key, handler).is_some();

        self.record_metric(|metrics| metrics.record_registration(replaced));
        let (level, message, stage) = if replaced {
            (
                LogLevel::Debug,
                "route_replaced",
                NavigationAuditStage::RouteReplaced,
            )
        } else {
            (
                LogLevel::Debug,
                "route_registered",
                NavigationAuditStage::RouteRegistered,
            )
        };
        self.log(
            level,
            REGISTRY_TARGET,
            message,
            [json_str("screen", tag), json_str("handler", name.clone())],
        );
        self.audit(stage, |builder| {
            builder.detail("screen", tag).detail("handler", name);
        });
    }

    pub fn handler(&self, identifier: &ScreenIdentifier) -> Option<Rc<dyn Route>> {
        self.registry.borrow().get(identifier).cloned()
    }

    pub fn registered(&self) -> Vec<ScreenIdentifier> {
        let mut keys: Vec<_> = self.registry.borrow().keys().cloned().collect();
        keys.sort_by_key(|identifier| identifier.tag());
        keys
    }

    /// Dispatch an identifier to its handler. Without an identifier the
    /// operation is applied directly, which is how back-navigation works.
    /// Unregistered identifiers are a silent no-op.
    pub fn route(
        &self,
        identifier: Option<&ScreenIdentifier>,
        source: Option<NodeRef>,
        operation: NavigationOperation,
    ) {
        let Some(identifier) = identifier else {
            self.navigate(source, None, operation);
            return;
        };

        let handler = self.handler(identifier);
        self.record_metric(|metrics| metrics.record_route(handler.is_some()));
        match handler {
            Some(handler) => {
                self.log(
                    LogLevel::Debug,
                    DISPATCH_TARGET,
                    "route_dispatched",
                    [
                        json_str("screen", identifier.tag()),
                        json_str("handler", handler.name()),
                        json_str("operation", operation.tag()),
                    ],
                );
                self.audit(NavigationAuditStage::RouteDispatched, |builder| {
                    builder
                        .detail("screen", identifier.tag())
                        .detail("operation", operation.tag());
                });
                handler.start(source, identifier, operation);
            }
            None => {
                self.log(
                    LogLevel::Debug,
                    DISPATCH_TARGET,
                    "route_missed",
                    [json_str("screen", identifier.tag())],
                );
                self.audit(NavigationAuditStage::RouteMissed, |builder| {
                    builder.detail("screen", identifier.tag());
                });
            }
        }
    }

    /// Perform a transition from `source` (or the top-most node) to
    /// `destination`.
    pub fn navigate(
        &self,
        source: Option<NodeRef>,
        destination: Option<NodeRef>,
        operation: NavigationOperation,
    ) {
        let Some(source) = source.or_else(|| self.top_most()) else {
            self.record_metric(RouterMetrics::record_unresolved_source);
            self.log(
                LogLevel::Debug,
                TRANSITION_TARGET,
                "source_unresolved",
                [json_str("operation", operation.tag())],
            );
            self.audit(NavigationAuditStage::SourceUnresolved, |builder| {
                builder.detail("operation", operation.tag());
            });
            return;
        };

        let destination_title = destination.as_ref().map(|node| node.title());
        let applied = self.apply(&source, destination, &operation);

        self.record_metric(|metrics| metrics.record_transition(applied));
        let mut fields = vec![
            json_str("operation", operation.tag()),
            json_kv("animated", operation.is_animated()),
            json_str("source", source.title()),
        ];
        if let Some(title) = &destination_title {
            fields.push(json_str("destination", title.clone()));
        }
        let (message, stage) = if applied {
            ("transition_applied", NavigationAuditStage::TransitionApplied)
        } else {
            ("transition_skipped", NavigationAuditStage::TransitionSkipped)
        };
        self.log(LogLevel::Debug, TRANSITION_TARGET, message, fields);
        self.audit(stage, |builder| {
            builder
                .detail("operation", operation.tag())
                .detail("source", source.id().get());
            if let Some(title) = destination_title {
                builder.detail("destination", title);
            }
        });
    }

    fn apply(
        &self,
        source: &NodeRef,
        destination: Option<NodeRef>,
        operation: &NavigationOperation,
    ) -> bool {
        match operation {
            NavigationOperation::Open(OpenOperation::Root { .. }) => {
                let (Some(destination), Some(stack)) = (destination, source.enclosing_stack())
                else {
                    return false;
                };
                stack.set_stack(vec![destination])
            }
            NavigationOperation::Open(OpenOperation::Push {
                hides_chrome,
                completion,
                ..
            }) => {
                let Some(destination) = destination else {
                    return false;
                };
                destination.set_hides_chrome(*hides_chrome);
                let applied = source
                    .enclosing_stack()
                    .is_some_and(|stack| stack.push(destination));
                fire(completion.as_ref());
                applied
            }
            NavigationOperation::Open(OpenOperation::Present {
                style, completion, ..
            }) => {
                let Some(destination) = destination else {
                    return false;
                };
                destination.set_presentation_style(*style);
                if source.present(destination) {
                    fire(completion.as_ref());
                    true
                } else {
                    self.log(
                        LogLevel::Debug,
                        TRANSITION_TARGET,
                        "present_refused",
                        [json_str("source", source.title())],
                    );
                    false
                }
            }
            NavigationOperation::Close(CloseOperation::Pop { completion, .. }) => {
                let applied = source
                    .enclosing_stack()
                    .and_then(|stack| stack.pop())
                    .is_some();
                fire(completion.as_ref());
                applied
            }
            NavigationOperation::Close(CloseOperation::Dismiss { completion, .. }) => {
                let dismissed = source.dismiss_presented().or_else(|| {
                    source
                        .overlay_host()
                        .and_then(|host| host.dismiss_presented())
                });
                fire(completion.as_ref());
                dismissed.is_some()
            }
            NavigationOperation::Close(CloseOperation::PopToNode {
                target, completion, ..
            }) => {
                let applied = match (target.upgrade(), source.enclosing_stack()) {
                    (Some(target), Some(stack)) => !stack.pop_to(&target).is_empty(),
                    _ => false,
                };
                fire(completion.as_ref());
                applied
            }
            NavigationOperation::Close(CloseOperation::PopToRoot { completion, .. }) => {
                let applied = source
                    .enclosing_stack()
                    .is_some_and(|stack| !stack.pop_to_root().is_empty());
                fire(completion.as_ref());
                applied
            }
        }
    }

    /// Select a section by ordinal. Out-of-range indices are ignored.
    pub fn open(&self, index: usize) {
        if self.sections.select(index) {
            self.record_metric(RouterMetrics::record_section_change);
            self.log(
                LogLevel::Debug,
                DISPATCH_TARGET,
                "section_opened",
                [json_kv("index", index)],
            );
            self.audit(NavigationAuditStage::SectionOpened, |builder| {
                builder.detail("index", index);
            });
        } else {
            self.log(
                LogLevel::Warn,
                DISPATCH_TARGET,
                "section_out_of_range",
                [
                    json_kv("index", index),
                    json_kv("sections", self.sections.children().len()),
                ],
            );
            self.audit(NavigationAuditStage::SectionRejected, |builder| {
                builder.detail("index", index);
            });
        }
    }

    pub fn open_section(&self, section: Section) {
        self.open(section.index());
    }

    pub fn selected_section(&self) -> Option<Section> {
        self.sections.selected_index().and_then(Section::from_index)
    }

    /// The node a user currently sees: selected section, then any overlay,
    /// then the visible stack element. `None` when no section is showing.
    pub fn top_most(&self) -> Option<NodeRef> {
        self.sections
            .visible_leaf()
            .filter(|leaf| !leaf.is_sections())
    }

    pub fn sections(&self) -> &NodeRef {
        &self.sections
    }

    /// The stack hosting a section.
    pub fn section_stack(&self, section: Section) -> Option<NodeRef> {
        self.sections
            .children()
            .get(section.index())
            .map(Rc::clone)
            .filter(|node| node.is_stack())
    }

    pub fn metrics(&self) -> Option<MetricSnapshot> {
        self.config
            .metrics
            .as_ref()
            .map(|metrics| metrics.borrow().snapshot())
    }

    /// Write the current metrics snapshot to the logger, if both are enabled.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics()) {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }

    fn record_metric(&self, record: impl FnOnce(&mut RouterMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            record(&mut *metrics.borrow_mut());
        }
    }

    fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if logger.enabled(level) {
                let event = event_with_fields(level, target, message, fields);
                let _ = logger.log_event(event);
            }
        }
    }

    fn audit(
        &self,
        stage: NavigationAuditStage,
        details: impl FnOnce(&mut NavigationAuditEventBuilder),
    ) {
        let mut builder = NavigationAuditEventBuilder::new(stage);
        details(&mut builder);
        self.config.audit.record(builder.finish());
    }
}

fn fire(completion: Option<&Completion>) {
    if let Some(completion) = completion {
        completion.fire();
    }
}

impl std::fmt::Debug for AppRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRouter")
            .field("routes", &self.registered())
            .field("sections", &self.sections)
            .finish()
    }
}
