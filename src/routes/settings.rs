use std::rc::Rc;

use crate::identifier::{DetailDependency, ScreenIdentifier, Section};
use crate::navigation::NavigationOperation;
use crate::presentation::{Node, NodeRef, WeakSlot};
use crate::router::AppRouter;
use crate::screens::{SettingsRouter, SettingsScreen};

use super::{Route, RouteContext};

/// Settings is the root of its section and can also be pushed from elsewhere.
/// Either way the most recent settings screen is remembered so its detail
/// page is pushed on the right stack.
#[derive(Debug)]
pub struct SettingsRoute {
    context: RouteContext,
    settings: WeakSlot,
}

impl SettingsRoute {
    pub fn new(router: &Rc<AppRouter>, container: &NodeRef) -> Rc<Self> {
        Rc::new(Self {
            context: RouteContext::new(router, container),
            settings: WeakSlot::new(),
        })
    }

    pub fn cached(&self) -> Option<NodeRef> {
        self.settings.get()
    }

    fn make_screen(self: &Rc<Self>) -> NodeRef {
        let node = Node::screen(SettingsScreen::new());
        if let Some(screen) = node.content::<SettingsScreen>() {
            screen.set_router(Rc::clone(self) as Rc<dyn SettingsRouter>);
        }
        node
    }
}

impl Route for SettingsRoute {
    fn name(&self) -> &str {
        "settings"
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
        if operation.is_root() {
            let Some(container) = self.context.container() else {
                return;
            };
            router.open_section(Section::Settings);
            let settings = self.settings.reuse_or(true, || self.make_screen());
            router.navigate(Some(container), Some(settings), operation);
        } else {
            let settings = self.settings.reuse_or(false, || self.make_screen());
            router.navigate(source, Some(settings), operation);
        }
    }
}

impl SettingsRouter for SettingsRoute {
    fn navigate_to_detail(&self, _dependency: Option<DetailDependency>) {
        if let Some(router) = self.context.router() {
            router.route(
                Some(&ScreenIdentifier::SettingsDetail),
                self.settings.get(),
                NavigationOperation::push(),
            );
        }
    }
}
