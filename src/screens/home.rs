use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::identifier::DetailDependency;
use crate::presentation::Screen;

/// Item the home screen opens when its detail entry is tapped.
pub const HOME_ITEM: (i64, &str) = (1, "Home Item");

pub trait HomeRouter {
    fn navigate_to_settings(&self);
    fn navigate_to_detail(&self, dependency: Option<DetailDependency>);
}

#[derive(Default)]
pub struct HomeScreen {
    router: RefCell<Option<Rc<dyn HomeRouter>>>,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_router(&self, router: Rc<dyn HomeRouter>) {
        *self.router.borrow_mut() = Some(router);
    }

    pub fn has_router(&self) -> bool {
        self.router.borrow().is_some()
    }

    pub fn detail_tapped(&self) {
        if let Some(router) = self.router() {
            let (item_id, item_name) = HOME_ITEM;
            router.navigate_to_detail(Some(DetailDependency::new(item_id, item_name)));
        }
    }

    pub fn settings_tapped(&self) {
        if let Some(router) = self.router() {
            router.navigate_to_settings();
        }
    }

    fn router(&self) -> Option<Rc<dyn HomeRouter>> {
        self.router.borrow().clone()
    }
}

impl Screen for HomeScreen {
    fn title(&self) -> String {
        "Home".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
