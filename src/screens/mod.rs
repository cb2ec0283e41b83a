//! Feature screens and the router traits they navigate through.
//!
//! Screens never name each other. Each one holds a narrow router trait object
//! that a route handler installs, and its interaction methods do nothing
//! until one is installed.

mod detail;
mod home;
mod settings;

pub use self::detail::{DetailRouter, DetailScreen, SubDetailRouter, SubDetailScreen};
pub use self::home::{HOME_ITEM, HomeRouter, HomeScreen};
pub use self::settings::{
    SETTINGS_ITEM, SettingsDetailRouter, SettingsDetailScreen, SettingsRouter, SettingsScreen,
};
