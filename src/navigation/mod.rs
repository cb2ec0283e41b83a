//! Navigation operations: how a transition is performed.

mod core;

pub use self::core::{
    CloseOperation, Completion, NavigationOperation, OpenOperation, PresentationStyle,
};
