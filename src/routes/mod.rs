//! Route handlers: one per screen, each turning an identifier into a concrete
//! destination and handing the transition to `AppRouter`.

use std::rc::{Rc, Weak};

use crate::identifier::ScreenIdentifier;
use crate::navigation::NavigationOperation;
use crate::presentation::{NodeRef, WeakNode};
use crate::router::AppRouter;

mod detail;
mod home;
mod settings;
mod settings_detail;
mod sub_detail;

pub use self::detail::DetailRoute;
pub use self::home::HomeRoute;
pub use self::settings::SettingsRoute;
pub use self::settings_detail::SettingsDetailRoute;
pub use self::sub_detail::SubDetailRoute;

/// Capability every registered handler provides.
///
/// `start` may be called any number of times. Handlers reach the router and
/// their container weakly, so once either is gone `start` does nothing.
pub trait Route {
    fn name(&self) -> &str;

    fn start(
        self: Rc<Self>,
        source: Option<NodeRef>,
        identifier: &ScreenIdentifier,
        operation: NavigationOperation,
    );
}

/// Non-owning links shared by every handler.
#[derive(Debug, Clone)]
pub struct RouteContext {
    router: Weak<AppRouter>,
    container: WeakNode,
}

impl RouteContext {
    pub fn new(router: &Rc<AppRouter>, container: &NodeRef) -> Self {
        Self {
            router: Rc::downgrade(router),
            container: Rc::downgrade(container),
        }
    }

    pub fn router(&self) -> Option<Rc<AppRouter>> {
        self.router.upgrade()
    }

    pub fn container(&self) -> Option<NodeRef> {
        self.container.upgrade()
    }
}
