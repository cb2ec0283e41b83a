//! Presentation hierarchy: screens, stacks, section container and overlays.

mod core;
mod snapshot;

pub use self::core::{Node, NodeId, NodeRef, Screen, WeakNode, WeakSlot};
pub use self::snapshot::HierarchySnapshot;
