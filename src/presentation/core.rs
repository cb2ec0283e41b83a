use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::navigation::PresentationStyle;

pub type NodeRef = Rc<Node>;
pub type WeakNode = Weak<Node>;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Content hosted by a screen node. Feature modules implement this for their
/// screen types; the router never looks past it.
pub trait Screen: Any {
    fn title(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    /// Called once while the hosting node is being built.
    fn attached(&self, _node: WeakNode) {}
}

/// A non-owning node reference that resolves to `None` once the node is gone.
#[derive(Debug, Default)]
pub struct WeakSlot {
    slot: RefCell<WeakNode>,
}

impl WeakSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<NodeRef> {
        self.slot.borrow().upgrade()
    }

    pub fn set(&self, node: &NodeRef) {
        *self.slot.borrow_mut() = Rc::downgrade(node);
    }

    pub fn set_weak(&self, node: WeakNode) {
        *self.slot.borrow_mut() = node;
    }

    pub fn replace(&self, node: Option<&NodeRef>) {
        match node {
            Some(node) => self.set(node),
            None => self.clear(),
        }
    }

    pub fn clear(&self) {
        *self.slot.borrow_mut() = Weak::new();
    }

    /// Return the live node when `reuse` holds, otherwise build a new one and
    /// remember it. No borrow is held while `build` runs.
    pub fn reuse_or(&self, reuse: bool, build: impl FnOnce() -> NodeRef) -> NodeRef {
        if reuse {
            if let Some(node) = self.get() {
                return node;
            }
        }
        let node = build();
        self.set(&node);
        node
    }
}

enum NodeKind {
    Screen(Box<dyn Screen>),
    Stack(RefCell<Vec<NodeRef>>),
    Sections {
        children: Vec<NodeRef>,
        selected: Cell<usize>,
    },
}

/// One element of the presentation hierarchy: a screen, a stack container or
/// the top-level section container.
///
/// Ownership runs downwards (containers own their elements, presenters own
/// their overlay); every upward link is weak.
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    this: WeakNode,
    parent: RefCell<WeakNode>,
    presented: RefCell<Option<NodeRef>>,
    presenting: RefCell<WeakNode>,
    hides_chrome: Cell<bool>,
    style: Cell<Option<PresentationStyle>>,
}

impl Node {
    fn build(kind: NodeKind, this: &WeakNode) -> Self {
        Self {
            id: NodeId::next(),
            kind,
            this: this.clone(),
            parent: RefCell::new(Weak::new()),
            presented: RefCell::new(None),
            presenting: RefCell::new(Weak::new()),
            hides_chrome: Cell::new(false),
            style: Cell::new(None),
        }
    }

    pub fn screen<S: Screen>(content: S) -> NodeRef {
        Rc::new_cyclic(|this| {
            content.attached(this.clone());
            Self::build(NodeKind::Screen(Box::new(content)), this)
        })
    }

    pub fn stack() -> NodeRef {
        Rc::new_cyclic(|this| Self::build(NodeKind::Stack(RefCell::new(Vec::new())), this))
    }

    pub fn stack_with(root: NodeRef) -> NodeRef {
        let stack = Self::stack();
        stack.set_stack(vec![root]);
        stack
    }

    pub fn sections(children: Vec<NodeRef>) -> NodeRef {
        let node = Rc::new_cyclic(|this| {
            Self::build(
                NodeKind::Sections {
                    children: children.clone(),
                    selected: Cell::new(0),
                },
                this,
            )
        });
        for child in &children {
            child.attach_to(&node);
        }
        node
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn title(&self) -> String {
        match &self.kind {
            NodeKind::Screen(content) => content.title(),
            NodeKind::Stack(elements) => elements
                .borrow()
                .first()
                .map(|root| root.title())
                .unwrap_or_else(|| "Stack".to_string()),
            NodeKind::Sections { .. } => "Sections".to_string(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Screen(_) => "screen",
            NodeKind::Stack(_) => "stack",
            NodeKind::Sections { .. } => "sections",
        }
    }

    pub fn is_screen(&self) -> bool {
        matches!(self.kind, NodeKind::Screen(_))
    }

    pub fn is_stack(&self) -> bool {
        matches!(self.kind, NodeKind::Stack(_))
    }

    pub fn is_sections(&self) -> bool {
        matches!(self.kind, NodeKind::Sections { .. })
    }

    /// Downcast the hosted screen content.
    pub fn content<T: Screen>(&self) -> Option<&T> {
        match &self.kind {
            NodeKind::Screen(content) => content.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn is_same(&self, other: &NodeRef) -> bool {
        std::ptr::eq(self, Rc::as_ptr(other))
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().upgrade()
    }

    /// The stack this node lives in. A stack is its own enclosing stack.
    pub fn enclosing_stack(&self) -> Option<NodeRef> {
        if self.is_stack() {
            return self.this.upgrade();
        }
        self.parent().filter(|parent| parent.is_stack())
    }

    pub fn presented(&self) -> Option<NodeRef> {
        self.presented.borrow().clone()
    }

    pub fn presenting(&self) -> Option<NodeRef> {
        self.presenting.borrow().upgrade()
    }

    /// The node whose overlay contains this node, walking up through containers.
    pub fn overlay_host(&self) -> Option<NodeRef> {
        if let Some(host) = self.presenting() {
            return Some(host);
        }
        self.parent().and_then(|parent| parent.overlay_host())
    }

    pub fn hides_chrome(&self) -> bool {
        self.hides_chrome.get()
    }

    pub fn set_hides_chrome(&self, value: bool) {
        self.hides_chrome.set(value);
    }

    pub fn presentation_style(&self) -> Option<PresentationStyle> {
        self.style.get()
    }

    pub fn set_presentation_style(&self, style: PresentationStyle) {
        self.style.set(Some(style));
    }

    pub fn stack_elements(&self) -> Vec<NodeRef> {
        match &self.kind {
            NodeKind::Stack(elements) => elements.borrow().clone(),
            _ => Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        match &self.kind {
            NodeKind::Stack(elements) => elements.borrow().len(),
            _ => 0,
        }
    }

    pub fn top(&self) -> Option<NodeRef> {
        match &self.kind {
            NodeKind::Stack(elements) => elements.borrow().last().cloned(),
            _ => None,
        }
    }

    pub fn root_element(&self) -> Option<NodeRef> {
        match &self.kind {
            NodeKind::Stack(elements) => elements.borrow().first().cloned(),
            _ => None,
        }
    }

    /// Whether the section chrome is hidden by the element currently on top.
    pub fn chrome_hidden(&self) -> bool {
        self.depth() > 1 && self.top().is_some_and(|top| top.hides_chrome())
    }

    pub fn children(&self) -> Vec<NodeRef> {
        match &self.kind {
            NodeKind::Sections { children, .. } => children.clone(),
            NodeKind::Stack(elements) => elements.borrow().clone(),
            NodeKind::Screen(_) => Vec::new(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::Sections { selected, .. } => Some(selected.get()),
            _ => None,
        }
    }

    pub fn selected_child(&self) -> Option<NodeRef> {
        match &self.kind {
            NodeKind::Sections { children, selected } => children.get(selected.get()).cloned(),
            _ => None,
        }
    }

    /// Select a section by ordinal. Out-of-range indices leave the selection alone.
    pub fn select(&self, index: usize) -> bool {
        match &self.kind {
            NodeKind::Sections { children, selected } if index < children.len() => {
                selected.set(index);
                true
            }
            _ => false,
        }
    }

    /// The node a user currently sees: follow overlays first, then the
    /// selected section, then the top of each stack.
    pub fn visible_leaf(&self) -> Option<NodeRef> {
        let mut current = self.this.upgrade()?;
        loop {
            let next = current
                .presented()
                .or_else(|| current.selected_child())
                .or_else(|| current.top());
            match next {
                Some(next) => current = next,
                None => return Some(current),
            }
        }
    }

    fn attach_to(&self, parent: &NodeRef) {
        *self.parent.borrow_mut() = Rc::downgrade(parent);
    }

    fn detach(&self) {
        *self.parent.borrow_mut() = Weak::new();
    }

    fn stack_cell(&self) -> Option<&RefCell<Vec<NodeRef>>> {
        match &self.kind {
            NodeKind::Stack(elements) => Some(elements),
            _ => None,
        }
    }

    /// Whether this node is `node` or sits somewhere below it, following
    /// container and overlay links upwards.
    pub fn lies_within(&self, node: &NodeRef) -> bool {
        if self.is_same(node) {
            return true;
        }
        let mut current = self.parent().or_else(|| self.presenting());
        while let Some(ancestor) = current {
            if Rc::ptr_eq(&ancestor, node) {
                return true;
            }
            current = ancestor.parent().or_else(|| ancestor.presenting());
        }
        false
    }

    /// A node can move into this one unless that would close a loop or pull a
    /// section root out of the section container.
    fn accepts(&self, node: &NodeRef) -> bool {
        !self.lies_within(node) && !node.parent().is_some_and(|parent| parent.is_sections())
    }

    fn release_from_previous_stack(&self, node: &NodeRef) {
        if let Some(previous) = node.parent() {
            if previous.id != self.id {
                if let Some(cell) = previous.stack_cell() {
                    cell.borrow_mut().retain(|element| !Rc::ptr_eq(element, node));
                }
            }
        }
    }

    fn release_from_presenter(node: &NodeRef) {
        if let Some(host) = node.presenting() {
            let hosted = host
                .presented
                .borrow()
                .as_ref()
                .is_some_and(|overlay| Rc::ptr_eq(overlay, node));
            if hosted {
                host.presented.borrow_mut().take();
            }
        }
        *node.presenting.borrow_mut() = Weak::new();
    }

    /// Replace the whole stack. Returns `false` when this node is not a stack
    /// or when an element cannot move here.
    pub fn set_stack(&self, elements: Vec<NodeRef>) -> bool {
        let (Some(cell), Some(this)) = (self.stack_cell(), self.this.upgrade()) else {
            return false;
        };
        if !elements.iter().all(|element| self.accepts(element)) {
            return false;
        }
        for element in &elements {
            self.release_from_previous_stack(element);
            Self::release_from_presenter(element);
        }
        let previous = cell.replace(Vec::new());
        for old in &previous {
            if !elements.iter().any(|element| Rc::ptr_eq(element, old)) {
                old.detach();
            }
        }
        for element in &elements {
            element.attach_to(&this);
        }
        *cell.borrow_mut() = elements;
        true
    }

    /// Push onto this stack. Refused when the node is already in it or when
    /// this stack lies inside the node.
    pub fn push(&self, node: NodeRef) -> bool {
        let (Some(cell), Some(this)) = (self.stack_cell(), self.this.upgrade()) else {
            return false;
        };
        if cell.borrow().iter().any(|element| Rc::ptr_eq(element, &node)) || !self.accepts(&node) {
            return false;
        }
        self.release_from_previous_stack(&node);
        Self::release_from_presenter(&node);
        node.attach_to(&this);
        cell.borrow_mut().push(node);
        true
    }

    /// Pop the top element. The root element is never popped.
    pub fn pop(&self) -> Option<NodeRef> {
        let cell = self.stack_cell()?;
        let popped = {
            let mut elements = cell.borrow_mut();
            if elements.len() <= 1 {
                return None;
            }
            elements.pop()
        };
        if let Some(node) = &popped {
            node.detach();
        }
        popped
    }

    /// Pop everything above `target`. Empty when `target` is not in this stack.
    pub fn pop_to(&self, target: &NodeRef) -> Vec<NodeRef> {
        let Some(cell) = self.stack_cell() else {
            return Vec::new();
        };
        let position = cell
            .borrow()
            .iter()
            .position(|element| Rc::ptr_eq(element, target));
        match position {
            Some(index) => self.truncate(cell, index + 1),
            None => Vec::new(),
        }
    }

    pub fn pop_to_root(&self) -> Vec<NodeRef> {
        match self.stack_cell() {
            Some(cell) => self.truncate(cell, 1),
            None => Vec::new(),
        }
    }

    fn truncate(&self, cell: &RefCell<Vec<NodeRef>>, keep: usize) -> Vec<NodeRef> {
        let removed: Vec<NodeRef> = {
            let mut elements = cell.borrow_mut();
            if elements.len() <= keep {
                return Vec::new();
            }
            elements.split_off(keep)
        };
        for node in &removed {
            node.detach();
        }
        removed
    }

    /// Attach an overlay. Refused when this node already presents one or
    /// lies inside the overlay.
    pub fn present(&self, overlay: NodeRef) -> bool {
        if self.presented.borrow().is_some() || !self.accepts(&overlay) {
            return false;
        }
        if let Some(cell) = overlay.parent().as_ref().and_then(|parent| parent.stack_cell()) {
            cell.borrow_mut().retain(|element| !Rc::ptr_eq(element, &overlay));
        }
        Self::release_from_presenter(&overlay);
        overlay.detach();
        *overlay.presenting.borrow_mut() = self.this.clone();
        *self.presented.borrow_mut() = Some(overlay);
        true
    }

    /// Remove the overlay this node presents, along with anything stacked on it.
    pub fn dismiss_presented(&self) -> Option<NodeRef> {
        let overlay = self.presented.borrow_mut().take()?;
        *overlay.presenting.borrow_mut() = Weak::new();
        Some(overlay)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind_name())
            .field("title", &self.title())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(&'static str);

    impl Screen for Label {
        fn title(&self) -> String {
            self.0.to_string()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn label(title: &'static str) -> NodeRef {
        Node::screen(Label(title))
    }

    #[test]
    fn pop_never_removes_root() {
        let stack = Node::stack_with(label("root"));
        assert!(stack.pop().is_none());
        assert!(stack.push(label("child")));
        assert_eq!(stack.pop().map(|node| node.title()), Some("child".to_string()));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn push_sets_parent_and_refuses_duplicates() {
        let stack = Node::stack();
        let screen = label("a");
        assert!(stack.push(Rc::clone(&screen)));
        assert!(!stack.push(Rc::clone(&screen)));
        assert!(Rc::ptr_eq(&screen.enclosing_stack().unwrap(), &stack));
        assert!(Rc::ptr_eq(&stack.enclosing_stack().unwrap(), &stack));
    }

    #[test]
    fn moving_a_node_releases_it_from_its_old_stack() {
        let first = Node::stack();
        let second = Node::stack();
        let screen = label("moving");
        first.push(Rc::clone(&screen));
        second.set_stack(vec![Rc::clone(&screen)]);
        assert_eq!(first.depth(), 0);
        assert!(Rc::ptr_eq(&screen.parent().unwrap(), &second));
    }

    #[test]
    fn pop_to_and_pop_to_root() {
        let stack = Node::stack_with(label("root"));
        let middle = label("middle");
        stack.push(Rc::clone(&middle));
        stack.push(label("top"));
        stack.push(label("higher"));

        assert_eq!(stack.pop_to(&middle).len(), 2);
        assert!(Rc::ptr_eq(&stack.top().unwrap(), &middle));
        assert!(stack.pop_to(&label("stranger")).is_empty());
        assert_eq!(stack.pop_to_root().len(), 1);
        assert_eq!(stack.depth(), 1);
        assert!(middle.parent().is_none());
    }

    #[test]
    fn present_and_dismiss() {
        let host = label("host");
        let overlay = Node::stack_with(label("sheet"));
        assert!(host.present(Rc::clone(&overlay)));
        assert!(!host.present(label("second")));

        let inner = overlay.top().unwrap();
        assert!(Rc::ptr_eq(&inner.overlay_host().unwrap(), &host));
        assert!(Rc::ptr_eq(&host.dismiss_presented().unwrap(), &overlay));
        assert!(host.presented().is_none());
        assert!(overlay.presenting().is_none());
    }

    #[test]
    fn visible_leaf_follows_sections_overlays_and_stacks() {
        let home = Node::stack_with(label("home"));
        let settings = Node::stack_with(label("settings"));
        let sections = Node::sections(vec![Rc::clone(&home), Rc::clone(&settings)]);
        assert_eq!(sections.visible_leaf().unwrap().title(), "home");

        assert!(sections.select(1));
        assert!(!sections.select(5));
        assert_eq!(sections.selected_index(), Some(1));
        let top = settings.top().unwrap();
        top.present(Node::stack_with(label("modal")));
        assert_eq!(sections.visible_leaf().unwrap().title(), "modal");
    }

    #[test]
    fn moving_a_presented_node_releases_its_presenter() {
        let host = label("host");
        let pushed = label("pushed");
        assert!(host.present(Rc::clone(&pushed)));
        let stack = Node::stack_with(label("root"));
        assert!(stack.push(Rc::clone(&pushed)));
        assert!(host.presented().is_none());
        assert!(pushed.presenting().is_none());

        let rooted = label("rooted");
        assert!(host.present(Rc::clone(&rooted)));
        assert!(stack.set_stack(vec![Rc::clone(&rooted)]));
        assert!(host.presented().is_none());
        assert!(rooted.presenting().is_none());
        assert!(Rc::ptr_eq(&rooted.parent().unwrap(), &stack));
    }

    #[test]
    fn presenting_a_stacked_node_takes_it_out_of_the_stack() {
        let stack = Node::stack_with(label("root"));
        let sheet = label("sheet");
        stack.push(Rc::clone(&sheet));
        let host = label("host");
        assert!(host.present(Rc::clone(&sheet)));
        assert_eq!(stack.depth(), 1);
        assert!(sheet.parent().is_none());
        assert!(Rc::ptr_eq(&sheet.presenting().unwrap(), &host));
    }

    #[test]
    fn refuses_moves_that_would_close_a_loop() {
        let stack = Node::stack_with(label("root"));
        let root = stack.root_element().unwrap();
        assert!(!root.present(Rc::clone(&stack)));
        assert!(!stack.push(Rc::clone(&stack)));
        assert!(!stack.set_stack(vec![Rc::clone(&stack)]));

        let overlay = Node::stack_with(label("sheet"));
        assert!(root.present(Rc::clone(&overlay)));
        let sheet = overlay.top().unwrap();
        assert!(!overlay.push(Rc::clone(&stack)));
        assert!(!sheet.present(Rc::clone(&stack)));
        assert!(overlay.lies_within(&stack));
        assert!(!stack.lies_within(&overlay));

        let sections = Node::sections(vec![Rc::clone(&stack)]);
        assert!(!Node::stack().push(Rc::clone(&stack)));
        assert_eq!(sections.visible_leaf().unwrap().title(), "sheet");
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn chrome_follows_top_element() {
        let stack = Node::stack_with(label("root"));
        let pushed = label("pushed");
        pushed.set_hides_chrome(true);
        stack.push(pushed);
        assert!(stack.chrome_hidden());
        stack.pop();
        assert!(!stack.chrome_hidden());
    }

    #[test]
    fn weak_slot_tracks_liveness() {
        let slot = WeakSlot::new();
        let built = slot.reuse_or(true, || label("cached"));
        let again = slot.reuse_or(true, || label("other"));
        assert!(Rc::ptr_eq(&built, &again));
        let fresh = slot.reuse_or(false, || label("fresh"));
        assert!(!Rc::ptr_eq(&built, &fresh));
        drop(built);
        drop(again);
        assert_eq!(slot.get().map(|node| node.title()), Some("fresh".to_string()));
        drop(fresh);
        assert!(slot.get().is_none());
    }
}
