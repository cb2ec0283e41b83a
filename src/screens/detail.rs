use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::identifier::DetailDependency;
use crate::presentation::{NodeRef, Screen, WeakNode, WeakSlot};

pub trait DetailRouter {
    fn back_to_home(&self);
    fn route_to_sub_detail(&self, source: NodeRef, dependency: DetailDependency);
}

pub trait SubDetailRouter {
    fn back_to_detail(&self);
}

/// Shows one item. Remembers its hosting node so it can hand itself over as
/// the source of a push.
pub struct DetailScreen {
    dependency: Option<DetailDependency>,
    node: WeakSlot,
    router: RefCell<Option<Rc<dyn DetailRouter>>>,
}

impl DetailScreen {
    pub fn new(dependency: Option<DetailDependency>) -> Self {
        Self {
            dependency,
            node: WeakSlot::new(),
            router: RefCell::new(None),
        }
    }

    pub fn dependency(&self) -> Option<&DetailDependency> {
        self.dependency.as_ref()
    }

    pub fn set_router(&self, router: Rc<dyn DetailRouter>) {
        *self.router.borrow_mut() = Some(router);
    }

    pub fn has_router(&self) -> bool {
        self.router.borrow().is_some()
    }

    pub fn back_tapped(&self) {
        if let Some(router) = self.router() {
            router.back_to_home();
        }
    }

    /// Needs an item and a live hosting node; otherwise nothing happens.
    pub fn sub_detail_tapped(&self) {
        let (Some(router), Some(node), Some(dependency)) =
            (self.router(), self.node.get(), self.dependency.clone())
        else {
            return;
        };
        router.route_to_sub_detail(node, dependency);
    }

    fn router(&self) -> Option<Rc<dyn DetailRouter>> {
        self.router.borrow().clone()
    }
}

impl Screen for DetailScreen {
    fn title(&self) -> String {
        self.dependency
            .as_ref()
            .map(|dependency| dependency.item_name.clone())
            .unwrap_or_else(|| "Detail".to_string())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn attached(&self, node: WeakNode) {
        self.node.set_weak(node);
    }
}

pub struct SubDetailScreen {
    dependency: Option<DetailDependency>,
    router: RefCell<Option<Rc<dyn SubDetailRouter>>>,
}

impl SubDetailScreen {
    pub fn new(dependency: Option<DetailDependency>) -> Self {
        Self {
            dependency,
            router: RefCell::new(None),
        }
    }

    pub fn dependency(&self) -> Option<&DetailDependency> {
        self.dependency.as_ref()
    }

    pub fn set_router(&self, router: Rc<dyn SubDetailRouter>) {
        *self.router.borrow_mut() = Some(router);
    }

    pub fn back_tapped(&self) {
        let router = self.router.borrow().clone();
        if let Some(router) = router {
            router.back_to_detail();
        }
    }
}

impl Screen for SubDetailScreen {
    fn title(&self) -> String {
        self.dependency
            .as_ref()
            .map(|dependency| dependency.item_name.clone())
            .unwrap_or_else(|| "Sub Detail".to_string())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::Node;
    use std::cell::Cell;

    #[derive(Default)]
    struct Recorder {
        sub_detail_sources: RefCell<Vec<String>>,
        home: Cell<usize>,
    }

    impl DetailRouter for Recorder {
        fn back_to_home(&self) {
            self.home.set(self.home.get() + 1);
        }

        fn route_to_sub_detail(&self, source: NodeRef, dependency: DetailDependency) {
            self.sub_detail_sources
                .borrow_mut()
                .push(format!("{}:{}", source.title(), dependency.item_id));
        }
    }

    #[test]
    fn titles_fall_back_without_dependency() {
        assert_eq!(DetailScreen::new(None).title(), "Detail");
        assert_eq!(SubDetailScreen::new(None).title(), "Sub Detail");
        let dep = DetailDependency::new(4, "Lamp");
        assert_eq!(DetailScreen::new(Some(dep.clone())).title(), "Lamp");
        assert_eq!(SubDetailScreen::new(Some(dep)).title(), "Lamp");
    }

    #[test]
    fn sub_detail_tap_passes_hosting_node() {
        let node = Node::screen(DetailScreen::new(Some(DetailDependency::new(9, "Chair"))));
        let screen = node.content::<DetailScreen>().unwrap();
        let recorder = Rc::new(Recorder::default());
        screen.set_router(recorder.clone());

        screen.sub_detail_tapped();
        screen.back_tapped();
        assert_eq!(*recorder.sub_detail_sources.borrow(), vec!["Chair:9".to_string()]);
        assert_eq!(recorder.home.get(), 1);
    }

    #[test]
    fn sub_detail_tap_needs_an_item() {
        let node = Node::screen(DetailScreen::new(None));
        let screen = node.content::<DetailScreen>().unwrap();
        let recorder = Rc::new(Recorder::default());
        screen.set_router(recorder.clone());
        screen.sub_detail_tapped();
        assert!(recorder.sub_detail_sources.borrow().is_empty());
    }
}
