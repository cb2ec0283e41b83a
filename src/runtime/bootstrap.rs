//! Wires the section container, the five handlers and the initial roots.

use std::rc::Rc;

use crate::identifier::{DetailDependency, ScreenIdentifier, Section};
use crate::logging::{DISPATCH_TARGET, LogLevel, json_kv};
use crate::navigation::NavigationOperation;
use crate::presentation::{Node, NodeRef};
use crate::router::AppRouter;
use crate::routes::{DetailRoute, HomeRoute, SettingsDetailRoute, SettingsRoute, SubDetailRoute};

use super::RouterConfig;

/// Item the detail section starts on.
pub const INITIAL_DETAIL: (i64, &str) = (1, "Initialization");

/// A fully wired application: router, one stack per section and typed
/// handles to every registered handler.
pub struct App {
    pub router: Rc<AppRouter>,
    pub home_stack: NodeRef,
    pub detail_stack: NodeRef,
    pub settings_stack: NodeRef,
    pub home: Rc<HomeRoute>,
    pub detail: Rc<DetailRoute>,
    pub sub_detail: Rc<SubDetailRoute>,
    pub settings: Rc<SettingsRoute>,
    pub settings_detail: Rc<SettingsDetailRoute>,
}

impl App {
    pub fn stack(&self, section: Section) -> &NodeRef {
        match section {
            Section::Home => &self.home_stack,
            Section::Detail => &self.detail_stack,
            Section::Settings => &self.settings_stack,
        }
    }

    /// Titles on a section's stack, bottom first.
    pub fn titles(&self, section: Section) -> Vec<String> {
        self.stack(section)
            .stack_elements()
            .iter()
            .map(|node| node.title())
            .collect()
    }
}

/// Build the application. Roots start in a fixed order (settings, detail,
/// home) so the home section ends up selected.
pub fn bootstrap(config: RouterConfig) -> App {
    let home_stack = Node::stack();
    let detail_stack = Node::stack();
    let settings_stack = Node::stack();
    let sections = Node::sections(vec![
        Rc::clone(&home_stack),
        Rc::clone(&detail_stack),
        Rc::clone(&settings_stack),
    ]);
    let router = AppRouter::new(sections, config);

    let home = HomeRoute::new(&router, &home_stack);
    let settings = SettingsRoute::new(&router, &settings_stack);
    let detail = DetailRoute::new(&router, &detail_stack);
    let sub_detail = SubDetailRoute::new(&router, &detail_stack);
    let settings_detail = SettingsDetailRoute::new(&router, &settings_stack);

    router.register_route(ScreenIdentifier::Home, home.clone());
    router.register_route(ScreenIdentifier::Settings, settings.clone());
    router.register_route(ScreenIdentifier::Detail(None), detail.clone());
    router.register_route(ScreenIdentifier::SubDetail(None), sub_detail.clone());
    router.register_route(ScreenIdentifier::SettingsDetail, settings_detail.clone());

    router.route(
        Some(&ScreenIdentifier::Settings),
        None,
        NavigationOperation::root(),
    );
    let (item_id, item_name) = INITIAL_DETAIL;
    router.route(
        Some(&ScreenIdentifier::detail(DetailDependency::new(
            item_id, item_name,
        ))),
        None,
        NavigationOperation::root(),
    );
    router.route(Some(&ScreenIdentifier::Home), None, NavigationOperation::root());

    if let Some(logger) = router.config().logger.as_ref() {
        let _ = logger.log_with_fields(
            LogLevel::Info,
            DISPATCH_TARGET,
            "bootstrap_complete",
            [json_kv("routes", router.registered().len())].into_iter().collect(),
        );
    }

    App {
        router,
        home_stack,
        detail_stack,
        settings_stack,
        home,
        detail,
        sub_detail,
        settings,
        settings_detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_starts_every_section_root() {
        let app = bootstrap(RouterConfig::default());
        assert_eq!(app.titles(Section::Home), vec!["Home"]);
        assert_eq!(app.titles(Section::Detail), vec!["Initialization"]);
        assert_eq!(app.titles(Section::Settings), vec!["Settings"]);
        assert_eq!(app.router.selected_section(), Some(Section::Home));
        assert_eq!(app.router.registered().len(), 5);
        assert!(app.home.cached().is_some());
        assert!(app.settings.cached().is_some());
        assert!(app.detail.cached().is_some());
    }
}
