use serde::Serialize;

use super::core::{Node, NodeId};

/// Serializable picture of the hierarchy below a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchySnapshot {
    pub id: NodeId,
    pub kind: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hides_chrome: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchySnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presented: Option<Box<HierarchySnapshot>>,
}

impl HierarchySnapshot {
    pub fn capture(node: &Node) -> Self {
        Self {
            id: node.id(),
            kind: node.kind_name(),
            title: node.title(),
            selected: node.selected_index(),
            hides_chrome: node.hides_chrome(),
            children: node
                .children()
                .iter()
                .map(|child| Self::capture(child))
                .collect(),
            presented: node
                .presented()
                .map(|overlay| Box::new(Self::capture(&overlay))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn fingerprint(&self) -> blake3::Hash {
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&encoded)
    }

    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint().to_hex().to_string()
    }

    /// Number of nodes captured, overlays included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
            + self.presented.as_ref().map_or(0, |overlay| overlay.node_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::Screen;
    use std::any::Any;

    struct Plain;

    impl Screen for Plain {
        fn title(&self) -> String {
            "Plain".into()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn fingerprint_tracks_structure() {
        let stack = Node::stack_with(Node::screen(Plain));
        let sections = Node::sections(vec![stack.clone()]);
        let before = HierarchySnapshot::capture(&sections);
        assert_eq!(before.node_count(), 3);
        assert_eq!(
            before.fingerprint(),
            HierarchySnapshot::capture(&sections).fingerprint()
        );

        stack.push(Node::screen(Plain));
        let after = HierarchySnapshot::capture(&sections);
        assert_ne!(before.fingerprint_hex(), after.fingerprint_hex());
        assert_eq!(after.to_json()["kind"], "sections");
        assert_eq!(after.to_json()["children"][0]["children"][1]["title"], "Plain");
    }
}
