use std::rc::Rc;

use crate::identifier::ScreenIdentifier;
use crate::navigation::NavigationOperation;
use crate::presentation::{Node, NodeRef, WeakSlot};
use crate::router::AppRouter;
use crate::screens::{SubDetailRouter, SubDetailScreen};

use super::{Route, RouteContext};

#[derive(Debug)]
pub struct SubDetailRoute {
    context: RouteContext,
    source: WeakSlot,
}

impl SubDetailRoute {
    pub fn new(router: &Rc<AppRouter>, container: &NodeRef) -> Rc<Self> {
        Rc::new(Self {
            context: RouteContext::new(router, container),
            source: WeakSlot::new(),
        })
    }

    /// The node the last sub-detail was opened from, while it is alive.
    pub fn source(&self) -> Option<NodeRef> {
        self.source.get()
    }
}

impl Route for SubDetailRoute {
    fn name(&self) -> &str {
        "sub_detail"
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
        self.source.replace(source.as_ref());
        let node = Node::screen(SubDetailScreen::new(identifier.dependency().cloned()));
        if let Some(screen) = node.content::<SubDetailScreen>() {
            screen.set_router(Rc::clone(&self) as Rc<dyn SubDetailRouter>);
        }
        router.navigate(source, Some(node), operation);
    }
}

impl SubDetailRouter for SubDetailRoute {
    fn back_to_detail(&self) {
        let (Some(router), Some(source)) = (self.context.router(), self.source.get()) else {
            return;
        };
        router.route(None, None, NavigationOperation::pop_to(&source));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{DetailDependency, Section};
    use crate::routes::testing::Fixture;

    #[test]
    fn back_pops_to_remembered_source() {
        let fixture = Fixture::new();
        let stack = fixture.stack(Section::Detail);
        let route = SubDetailRoute::new(&fixture.router, &stack);
        fixture
            .router
            .register_route(ScreenIdentifier::SubDetail(None), route.clone());
        fixture.router.open_section(Section::Detail);

        let origin = Node::screen(SubDetailScreen::new(None));
        stack.set_stack(vec![Rc::clone(&origin)]);
        let identifier = ScreenIdentifier::sub_detail(DetailDependency::new(3, "Nested"));
        fixture
            .router
            .route(Some(&identifier), Some(Rc::clone(&origin)), NavigationOperation::push());
        assert_eq!(fixture.titles(Section::Detail), vec!["Sub Detail", "Nested"]);
        assert!(Rc::ptr_eq(&route.source().unwrap(), &origin));

        route.back_to_detail();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn back_with_dead_source_does_nothing() {
        let fixture = Fixture::new();
        let stack = fixture.stack(Section::Detail);
        let route = SubDetailRoute::new(&fixture.router, &stack);
        {
            let transient = Node::screen(SubDetailScreen::new(None));
            route.clone().start(
                Some(transient),
                &ScreenIdentifier::SubDetail(None),
                NavigationOperation::push(),
            );
        }
        assert!(route.source().is_none());
        route.back_to_detail();
        assert_eq!(stack.depth(), 0);
    }
}
