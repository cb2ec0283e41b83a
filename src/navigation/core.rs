use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::Serialize;

use crate::presentation::{NodeRef, WeakNode};

/// How an overlay is laid over its presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStyle {
    #[default]
    Automatic,
    FullScreen,
    PageSheet,
    FormSheet,
    OverFullScreen,
    Custom,
}

/// One-shot callback fired after a transition completes.
///
/// Clones share the same slot, so however many copies of an operation exist
/// the callback runs at most once.
#[derive(Clone)]
pub struct Completion {
    callback: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl Completion {
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            callback: Rc::new(RefCell::new(Some(Box::new(callback)))),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Run the callback if it has not run yet.
    pub fn fire(&self) {
        let callback = self.callback.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum OpenOperation {
    /// Replace the container's whole stack with the destination.
    Root { animated: bool },
    /// Append the destination on top of the source's stack.
    Push {
        animated: bool,
        hides_chrome: bool,
        completion: Option<Completion>,
    },
    /// Show the destination as an overlay above the source.
    Present {
        animated: bool,
        style: PresentationStyle,
        completion: Option<Completion>,
    },
}

impl OpenOperation {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Root { .. } => "root",
            Self::Push { .. } => "push",
            Self::Present { .. } => "present",
        }
    }
}

impl Default for OpenOperation {
    fn default() -> Self {
        Self::Push {
            animated: true,
            hides_chrome: true,
            completion: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CloseOperation {
    Pop {
        animated: bool,
        completion: Option<Completion>,
    },
    Dismiss {
        animated: bool,
        completion: Option<Completion>,
    },
    PopToNode {
        target: WeakNode,
        animated: bool,
        completion: Option<Completion>,
    },
    PopToRoot {
        animated: bool,
        completion: Option<Completion>,
    },
}

impl CloseOperation {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pop { .. } => "pop",
            Self::Dismiss { .. } => "dismiss",
            Self::PopToNode { .. } => "pop_to_node",
            Self::PopToRoot { .. } => "pop_to_root",
        }
    }
}

impl Default for CloseOperation {
    fn default() -> Self {
        Self::Pop {
            animated: true,
            completion: None,
        }
    }
}

/// Describes how a transition is performed, independent of what is shown.
///
/// Equality and hashing only consider the leaf tag, so `root()` equals a
/// non-animated root. Callers use this to ask "is this a root-style open"
/// without caring about the parameters.
#[derive(Debug, Clone)]
pub enum NavigationOperation {
    Open(OpenOperation),
    Close(CloseOperation),
}

impl Default for NavigationOperation {
    fn default() -> Self {
        Self::Open(OpenOperation::default())
    }
}

impl NavigationOperation {
    pub fn root() -> Self {
        Self::Open(OpenOperation::Root { animated: true })
    }

    pub fn push() -> Self {
        Self::Open(OpenOperation::default())
    }

    pub fn present() -> Self {
        Self::Open(OpenOperation::Present {
            animated: true,
            style: PresentationStyle::default(),
            completion: None,
        })
    }

    pub fn pop() -> Self {
        Self::Close(CloseOperation::default())
    }

    pub fn dismiss() -> Self {
        Self::Close(CloseOperation::Dismiss {
            animated: true,
            completion: None,
        })
    }

    pub fn pop_to(target: &NodeRef) -> Self {
        Self::Close(CloseOperation::PopToNode {
            target: Rc::downgrade(target),
            animated: true,
            completion: None,
        })
    }

    pub fn pop_to_root() -> Self {
        Self::Close(CloseOperation::PopToRoot {
            animated: true,
            completion: None,
        })
    }

    pub fn animated(mut self, value: bool) -> Self {
        match &mut self {
            Self::Open(OpenOperation::Root { animated })
            | Self::Open(OpenOperation::Push { animated, .. })
            | Self::Open(OpenOperation::Present { animated, .. })
            | Self::Close(CloseOperation::Pop { animated, .. })
            | Self::Close(CloseOperation::Dismiss { animated, .. })
            | Self::Close(CloseOperation::PopToNode { animated, .. })
            | Self::Close(CloseOperation::PopToRoot { animated, .. }) => *animated = value,
        }
        self
    }

    /// Only meaningful for push; other leaves are returned unchanged.
    pub fn hides_chrome(mut self, value: bool) -> Self {
        if let Self::Open(OpenOperation::Push { hides_chrome, .. }) = &mut self {
            *hides_chrome = value;
        }
        self
    }

    /// Only meaningful for present; other leaves are returned unchanged.
    pub fn style(mut self, value: PresentationStyle) -> Self {
        if let Self::Open(OpenOperation::Present { style, .. }) = &mut self {
            *style = value;
        }
        self
    }

    /// Attach a completion callback. Root replacement has no completion, so
    /// the callback is dropped for that leaf.
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        if let Some(slot) = self.completion_slot() {
            *slot = Some(Completion::new(callback));
        }
        self
    }

    fn completion_slot(&mut self) -> Option<&mut Option<Completion>> {
        match self {
            Self::Open(OpenOperation::Root { .. }) => None,
            Self::Open(OpenOperation::Push { completion, .. })
            | Self::Open(OpenOperation::Present { completion, .. })
            | Self::Close(CloseOperation::Pop { completion, .. })
            | Self::Close(CloseOperation::Dismiss { completion, .. })
            | Self::Close(CloseOperation::PopToNode { completion, .. })
            | Self::Close(CloseOperation::PopToRoot { completion, .. }) => Some(completion),
        }
    }

    pub fn completion(&self) -> Option<&Completion> {
        match self {
            Self::Open(OpenOperation::Root { .. }) => None,
            Self::Open(OpenOperation::Push { completion, .. })
            | Self::Open(OpenOperation::Present { completion, .. })
            | Self::Close(CloseOperation::Pop { completion, .. })
            | Self::Close(CloseOperation::Dismiss { completion, .. })
            | Self::Close(CloseOperation::PopToNode { completion, .. })
            | Self::Close(CloseOperation::PopToRoot { completion, .. }) => completion.as_ref(),
        }
    }

    pub fn is_animated(&self) -> bool {
        match self {
            Self::Open(OpenOperation::Root { animated })
            | Self::Open(OpenOperation::Push { animated, .. })
            | Self::Open(OpenOperation::Present { animated, .. })
            | Self::Close(CloseOperation::Pop { animated, .. })
            | Self::Close(CloseOperation::Dismiss { animated, .. })
            | Self::Close(CloseOperation::PopToNode { animated, .. })
            | Self::Close(CloseOperation::PopToRoot { animated, .. }) => *animated,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Open(OpenOperation::Root { .. }) => "open_root",
            Self::Open(OpenOperation::Push { .. }) => "open_push",
            Self::Open(OpenOperation::Present { .. }) => "open_present",
            Self::Close(CloseOperation::Pop { .. }) => "close_pop",
            Self::Close(CloseOperation::Dismiss { .. }) => "close_dismiss",
            Self::Close(CloseOperation::PopToNode { .. }) => "close_pop_to_node",
            Self::Close(CloseOperation::PopToRoot { .. }) => "close_pop_to_root",
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Open(OpenOperation::Root { .. }))
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

impl PartialEq for NavigationOperation {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

impl Eq for NavigationOperation {}

impl Hash for NavigationOperation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
    }
}

impl fmt::Display for NavigationOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
