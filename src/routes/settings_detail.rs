use std::rc::Rc;

use crate::identifier::ScreenIdentifier;
use crate::navigation::NavigationOperation;
use crate::presentation::{Node, NodeRef, WeakSlot};
use crate::router::AppRouter;
use crate::screens::{SettingsDetailRouter, SettingsDetailScreen};

use super::{Route, RouteContext};

#[derive(Debug)]
pub struct SettingsDetailRoute {
    context: RouteContext,
    source: WeakSlot,
}

impl SettingsDetailRoute {
    pub fn new(router: &Rc<AppRouter>, container: &NodeRef) -> Rc<Self> {
        Rc::new(Self {
            context: RouteContext::new(router, container),
            source: WeakSlot::new(),
        })
    }

    pub fn source(&self) -> Option<NodeRef> {
        self.source.get()
    }
}

impl Route for SettingsDetailRoute {
    fn name(&self) -> &str {
        "settings_detail"
    }

    fn start(
        self: Rc<Self>,
        source: Option<NodeRef>,
        _identifier: &ScreenIdentifier,
        operation: NavigationOperation,
    ) {
        let Some(router) = self.context.router() else {
            return;
        };
        self.source.replace(source.as_ref());
        let node = Node::screen(SettingsDetailScreen::new());
        if let Some(screen) = node.content::<SettingsDetailScreen>() {
            screen.set_router(Rc::clone(&self) as Rc<dyn SettingsDetailRouter>);
        }
        router.navigate(source, Some(node), operation);
    }
}

impl SettingsDetailRouter for SettingsDetailRoute {
    fn back_to_settings(&self) {
        let (Some(router), Some(source)) = (self.context.router(), self.source.get()) else {
            return;
        };
        router.route(None, None, NavigationOperation::pop_to(&source));
    }
}
