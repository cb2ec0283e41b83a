use std::rc::Rc;

use crate::identifier::{DetailDependency, ScreenIdentifier, Section};
use crate::navigation::NavigationOperation;
use crate::presentation::{Node, NodeRef, WeakSlot};
use crate::router::AppRouter;
use crate::screens::{HomeRouter, HomeScreen};

use super::{Route, RouteContext};

/// Home is always the root of its own stack and is built at most once while
/// it stays alive.
#[derive(Debug)]
pub struct HomeRoute {
    context: RouteContext,
    home: WeakSlot,
}

impl HomeRoute {
    pub fn new(router: &Rc<AppRouter>, container: &NodeRef) -> Rc<Self> {
        Rc::new(Self {
            context: RouteContext::new(router, container),
            home: WeakSlot::new(),
        })
    }

    pub fn cached(&self) -> Option<NodeRef> {
        self.home.get()
    }

    fn make_screen(self: &Rc<Self>) -> NodeRef {
        let node = Node::screen(HomeScreen::new());
        if let Some(screen) = node.content::<HomeScreen>() {
            screen.set_router(Rc::clone(self) as Rc<dyn HomeRouter>);
        }
        node
    }
}

impl Route for HomeRoute {
    fn name(&self) -> &str {
        "home"
    }

    fn start(
        self: Rc<Self>,
        _source: Option<NodeRef>,
        _identifier: &ScreenIdentifier,
        _operation: NavigationOperation,
    ) {
        let (Some(router), Some(container)) = (self.context.router(), self.context.container())
        else {
            return;
        };
        router.open_section(Section::Home);
        let home = self.home.reuse_or(true, || self.make_screen());
        router.navigate(Some(container), Some(home), NavigationOperation::root());
    }
}

impl HomeRouter for HomeRoute {
    fn navigate_to_settings(&self) {
        if let Some(router) = self.context.router() {
            router.route(
                Some(&ScreenIdentifier::Settings),
                self.home.get(),
                NavigationOperation::push(),
            );
        }
    }

    fn navigate_to_detail(&self, dependency: Option<DetailDependency>) {
        if let Some(router) = self.context.router() {
            router.route(
                Some(&ScreenIdentifier::Detail(dependency)),
                None,
                NavigationOperation::root(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::Fixture;

    #[test]
    fn start_reuses_live_home_screen() {
        let fixture = Fixture::new();
        let container = fixture.stack(Section::Home);
        let route = HomeRoute::new(&fixture.router, &container);
        fixture
            .router
            .register_route(ScreenIdentifier::Home, route.clone());

        fixture
            .router
            .route(Some(&ScreenIdentifier::Home), None, NavigationOperation::push());
        let first = route.cached().unwrap();
        fixture
            .router
            .route(Some(&ScreenIdentifier::Home), None, NavigationOperation::push());

        assert!(Rc::ptr_eq(&first, &route.cached().unwrap()));
        assert_eq!(fixture.titles(Section::Home), vec!["Home"]);
        assert_eq!(fixture.router.selected_section(), Some(Section::Home));
        assert!(first.content::<HomeScreen>().unwrap().has_router());
    }

    #[test]
    fn start_without_router_is_a_no_op() {
        let fixture = Fixture::new();
        let container = fixture.stack(Section::Home);
        let route = HomeRoute::new(&fixture.router, &container);
        drop(fixture.router);
        route
            .clone()
            .start(None, &ScreenIdentifier::Home, NavigationOperation::root());
        assert!(route.cached().is_none());
        assert_eq!(container.depth(), 0);
    }
}
