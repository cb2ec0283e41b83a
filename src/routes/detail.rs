use std::rc::Rc;

use crate::identifier::{DetailDependency, ScreenIdentifier, Section};
use crate::navigation::NavigationOperation;
use crate::presentation::{Node, NodeRef, WeakSlot};
use crate::router::AppRouter;
use crate::screens::{DetailRouter, DetailScreen};

use super::{Route, RouteContext};

/// Detail can be a section root or a pushed page. Only root-style opens reuse
/// the cached screen, so the cached item wins over a new dependency there.
#[derive(Debug)]
pub struct DetailRoute {
    context: RouteContext,
    detail: WeakSlot,
}

impl DetailRoute {
    pub fn new(router: &Rc<AppRouter>, container: &NodeRef) -> Rc<Self> {
        Rc::new(Self {
            context: RouteContext::new(router, container),
            detail: WeakSlot::new(),
        })
    }

    pub fn cached(&self) -> Option<NodeRef> {
        self.detail.get()
    }

    fn make_screen(self: &Rc<Self>, dependency: DetailDependency) -> NodeRef {
        let node = Node::screen(DetailScreen::new(Some(dependency)));
        if let Some(screen) = node.content::<DetailScreen>() {
            screen.set_router(Rc::clone(self) as Rc<dyn DetailRouter>);
        }
        node
    }
}

impl Route for DetailRoute {
    fn name(&self) -> &str {
        "detail"
    }

    fn start(
        self: Rc<Self>,
        source: Option<NodeRef>,
        identifier: &ScreenIdentifier,
        operation: NavigationOperation,
    ) {
        let Some(router) = self.context.router() else {
            return;
        };
        let dependency = match identifier {
            ScreenIdentifier::Detail(Some(dependency)) => dependency.clone(),
            _ => {
                router.navigate(None, None, operation);
                return;
            }
        };

        let root = operation.is_root();
        if root {
            router.open_section(Section::Detail);
        }
        let detail = self
            .detail
            .reuse_or(root, || self.make_screen(dependency));
        router.navigate(source, Some(detail), operation);
    }
}

impl DetailRouter for DetailRoute {
    fn back_to_home(&self) {
        if let Some(router) = self.context.router() {
            router.route(
                Some(&ScreenIdentifier::Home),
                None,
                NavigationOperation::root(),
            );
        }
    }

    fn route_to_sub_detail(&self, source: NodeRef, dependency: DetailDependency) {
        if let Some(router) = self.context.router() {
            router.route(
                Some(&ScreenIdentifier::SubDetail(Some(dependency))),
                Some(source),
                NavigationOperation::push(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::Fixture;

    fn registered(fixture: &Fixture) -> Rc<DetailRoute> {
        let route = DetailRoute::new(&fixture.router, &fixture.stack(Section::Detail));
        fixture
            .router
            .register_route(ScreenIdentifier::detail(DetailDependency::new(0, "")), route.clone());
        route
    }

    #[test]
    fn root_open_selects_section_and_reuses_cache() {
        let fixture = Fixture::new();
        let route = registered(&fixture);

        let first = ScreenIdentifier::detail(DetailDependency::new(1, "First"));
        fixture
            .router
            .route(Some(&first), None, NavigationOperation::root());
        assert_eq!(fixture.router.selected_section(), Some(Section::Detail));
        assert_eq!(fixture.titles(Section::Detail), vec!["First"]);
        let cached = route.cached().unwrap();

        let second = ScreenIdentifier::detail(DetailDependency::new(2, "Second"));
        fixture
            .router
            .route(Some(&second), None, NavigationOperation::root());
        assert!(Rc::ptr_eq(&cached, &route.cached().unwrap()));
        assert_eq!(fixture.titles(Section::Detail), vec!["First"]);
    }

    #[test]
    fn push_builds_fresh_screen() {
        let fixture = Fixture::new();
        let route = registered(&fixture);
        let stack = fixture.stack(Section::Detail);
        let first = ScreenIdentifier::detail(DetailDependency::new(1, "First"));
        fixture
            .router
            .route(Some(&first), Some(Rc::clone(&stack)), NavigationOperation::root());
        let root = route.cached().unwrap();

        let second = ScreenIdentifier::detail(DetailDependency::new(2, "Second"));
        fixture
            .router
            .route(Some(&second), Some(Rc::clone(&root)), NavigationOperation::push());
        assert_eq!(fixture.titles(Section::Detail), vec!["First", "Second"]);
        assert!(!Rc::ptr_eq(&root, &route.cached().unwrap()));
        assert!(stack.top().unwrap().hides_chrome());
    }

    #[test]
    fn missing_dependency_falls_back_to_bare_navigation() {
        let fixture = Fixture::new();
        let route = registered(&fixture);
        let stack = fixture.stack(Section::Detail);
        let first = ScreenIdentifier::detail(DetailDependency::new(1, "First"));
        fixture
            .router
            .route(Some(&first), None, NavigationOperation::root());
        let root = route.cached().unwrap();
        let pushed = ScreenIdentifier::detail(DetailDependency::new(2, "Pushed"));
        fixture
            .router
            .route(Some(&pushed), Some(root), NavigationOperation::push());
        assert_eq!(stack.depth(), 2);

        fixture.router.route(
            Some(&ScreenIdentifier::Detail(None)),
            None,
            NavigationOperation::pop(),
        );
        assert_eq!(fixture.titles(Section::Detail), vec!["First"]);
    }
}
