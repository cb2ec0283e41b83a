//! Identifier-based screen routing.
//!
//! Feature modules navigate to each other's screens through opaque
//! [`ScreenIdentifier`]s. [`AppRouter`] resolves an identifier to a registered
//! [`Route`] handler, the handler builds or reuses its destination, and the
//! router applies the requested [`NavigationOperation`] to a shared
//! presentation hierarchy of stacks, sections and overlays.

pub mod error;
pub mod identifier;
pub mod logging;
pub mod metrics;
pub mod navigation;
pub mod presentation;
pub mod router;
pub mod routes;
pub mod runtime;
pub mod screens;

pub use error::{DecodeError, Result, RouterError};
pub use identifier::{DetailDependency, ScreenIdentifier, Section};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, StderrSink,
};
pub use metrics::{MetricSnapshot, RouterMetrics, SharedMetrics};
pub use navigation::{
    CloseOperation, Completion, NavigationOperation, OpenOperation, PresentationStyle,
};
pub use presentation::{HierarchySnapshot, Node, NodeId, NodeRef, Screen, WeakNode, WeakSlot};
pub use router::AppRouter;
pub use routes::{
    DetailRoute, HomeRoute, Route, RouteContext, SettingsDetailRoute, SettingsRoute,
    SubDetailRoute,
};
pub use runtime::RouterConfig;
pub use runtime::audit::{
    BufferedNavigationAudit, NavigationAudit, NavigationAuditEvent, NavigationAuditEventBuilder,
    NavigationAuditStage, NullNavigationAudit,
};
pub use runtime::bootstrap::{App, bootstrap};
pub use runtime::driver::{
    Acknowledgement, DeepLinkDriver, DeepLinkNavigation, DriverError, DriverResult,
};
pub use screens::{
    DetailRouter, DetailScreen, HomeRouter, HomeScreen, SettingsDetailRouter,
    SettingsDetailScreen, SettingsRouter, SettingsScreen, SubDetailRouter, SubDetailScreen,
};
