//! Screen identifiers and top-level sections.
//!
//! Identifiers are the only thing feature modules share: they name a screen,
//! optionally carry the item the screen should show, and round-trip through
//! JSON for deep links.

mod core;

pub use self::core::{DEPENDENCY_FIELD, DetailDependency, SCREEN_FIELD, ScreenIdentifier, Section};
