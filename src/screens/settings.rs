use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::identifier::DetailDependency;
use crate::presentation::Screen;

/// Item the settings screen sends when its detail entry is tapped.
pub const SETTINGS_ITEM: (i64, &str) = (2, "Settings Item");

pub trait SettingsRouter {
    fn navigate_to_detail(&self, dependency: Option<DetailDependency>);
}

pub trait SettingsDetailRouter {
    fn back_to_settings(&self);
}

#[derive(Default)]
pub struct SettingsScreen {
    router: RefCell<Option<Rc<dyn SettingsRouter>>>,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_router(&self, router: Rc<dyn SettingsRouter>) {
        *self.router.borrow_mut() = Some(router);
    }

    pub fn detail_tapped(&self) {
        let router = self.router.borrow().clone();
        if let Some(router) = router {
            let (item_id, item_name) = SETTINGS_ITEM;
            router.navigate_to_detail(Some(DetailDependency::new(item_id, item_name)));
        }
    }
}

impl Screen for SettingsScreen {
    fn title(&self) -> String {
        "Settings".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
pub struct SettingsDetailScreen {
    router: RefCell<Option<Rc<dyn SettingsDetailRouter>>>,
}

impl SettingsDetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_router(&self, router: Rc<dyn SettingsDetailRouter>) {
        *self.router.borrow_mut() = Some(router);
    }

    pub fn back_tapped(&self) {
        let router = self.router.borrow().clone();
        if let Some(router) = router {
            router.back_to_settings();
        }
    }
}

impl Screen for SettingsDetailScreen {
    fn title(&self) -> String {
        "Settings Detail".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Capture(RefCell<Option<DetailDependency>>);

    impl SettingsRouter for Capture {
        fn navigate_to_detail(&self, dependency: Option<DetailDependency>) {
            *self.0.borrow_mut() = dependency;
        }
    }

    #[test]
    fn detail_tap_sends_settings_item() {
        let screen = SettingsScreen::new();
        let capture = Rc::new(Capture(RefCell::new(None)));
        screen.set_router(capture.clone());
        screen.detail_tapped();
        let sent = capture.0.borrow().clone().unwrap();
        assert_eq!(sent.item_id, 2);
        assert_eq!(sent.item_name, "Settings Item");
        assert_eq!(SettingsDetailScreen::new().title(), "Settings Detail");
    }
}
