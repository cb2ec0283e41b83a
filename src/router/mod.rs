//! Central dispatcher: identifier registry plus the concrete transitions.

mod core;

pub use self::core::AppRouter;
