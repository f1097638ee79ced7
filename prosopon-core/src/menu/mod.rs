//! Menu tree
//!
//! The menu is a static tree of three node kinds: submenus, one-shot
//! actions, and multiple-choice settings. The set of kinds is closed, so
//! nodes are a tagged enum. Navigation state (which node is open) lives in
//! [`nav::MenuNav`], not in the nodes; each submenu and setting only keeps
//! its own cursor and scroll position.

mod nav;

pub use nav::{MenuNav, NavResult};

use alloc::boxed::Box;
use heapless::{String, Vec};

/// Maximum children in one submenu.
pub const MAX_CHILDREN: usize = 16;
/// Maximum options in one setting.
pub const MAX_OPTIONS: usize = 16;
/// Maximum menu nesting depth.
pub const MAX_DEPTH: usize = 6;

/// A display label, truncated to fit the smallest supported panel.
pub type Label = String<24>;

/// Build a label, truncating on a character boundary.
pub fn label(s: &str) -> Label {
    let mut out = Label::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// One node of the menu tree.
pub enum MenuNode {
    Menu(Submenu),
    Action(ActionItem),
    Setting(SettingItem),
}

impl MenuNode {
    /// The label shown for this node in its parent's listing.
    pub fn name(&self) -> &str {
        match self {
            MenuNode::Menu(m) => &m.name,
            MenuNode::Action(a) => &a.name,
            MenuNode::Setting(s) => &s.name,
        }
    }
}

/// A named list of child nodes.
///
/// Children live on the heap: nodes nest submenus inside submenus, so the
/// child list needs indirection to keep the node type finitely sized.
pub struct Submenu {
    pub name: Label,
    pub children: alloc::vec::Vec<MenuNode>,
    /// Index of the highlighted child
    pub selected: u8,
    /// Index of the first visible child
    pub top: u8,
}

impl Submenu {
    pub fn new(name: &str) -> Self {
        Self {
            name: label(name),
            children: alloc::vec::Vec::new(),
            selected: 0,
            top: 0,
        }
    }

    /// Append a child; silently full beyond [`MAX_CHILDREN`].
    pub fn push(&mut self, node: MenuNode) {
        if self.children.len() < MAX_CHILDREN {
            self.children.push(node);
        }
    }
}

/// A leaf that runs a callback when selected.
pub struct ActionItem {
    pub name: Label,
    pub invoke: Box<dyn FnMut()>,
}

impl ActionItem {
    pub fn new(name: &str, invoke: impl FnMut() + 'static) -> Self {
        Self {
            name: label(name),
            invoke: Box::new(invoke),
        }
    }
}

/// A leaf offering a list of options, one of which is active.
///
/// Opening the setting starts the cursor on the active option; confirming
/// a different option makes it active and fires the apply callback once.
pub struct SettingItem {
    pub name: Label,
    pub options: Vec<Label, MAX_OPTIONS>,
    pub active: u8,
    pub selected: u8,
    pub top: u8,
    pub apply: Box<dyn FnMut(u8)>,
}

impl SettingItem {
    pub fn new(name: &str, options: &[&str], active: u8, apply: impl FnMut(u8) + 'static) -> Self {
        let mut opts = Vec::new();
        for o in options {
            let _ = opts.push(label(o));
        }
        Self {
            name: label(name),
            options: opts,
            active,
            selected: active,
            top: 0,
            apply: Box::new(apply),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_truncates_to_capacity() {
        let l = label("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(l.as_str(), "abcdefghijklmnopqrstuvwx");
    }

    #[test]
    fn test_label_truncates_on_char_boundary() {
        // 23 ASCII chars then a 2-byte char that does not fit
        let s = "aaaaaaaaaaaaaaaaaaaaaaaéz";
        let l = label(s);
        assert_eq!(l.chars().count(), 23);
        assert!(l.as_str().ends_with('a'));
    }

    #[test]
    fn test_submenus_nest() {
        let mut inner = Submenu::new("Inner");
        inner.push(MenuNode::Action(ActionItem::new("leaf", || {})));
        let mut mid = Submenu::new("Mid");
        mid.push(MenuNode::Menu(inner));
        let mut root = Submenu::new("Root");
        root.push(MenuNode::Menu(mid));

        match &root.children[0] {
            MenuNode::Menu(mid) => match &mid.children[0] {
                MenuNode::Menu(inner) => assert_eq!(inner.children[0].name(), "leaf"),
                _ => panic!("expected nested submenu"),
            },
            _ => panic!("expected submenu"),
        }
    }

    #[test]
    fn test_push_caps_children() {
        let mut m = Submenu::new("Cap");
        for _ in 0..MAX_CHILDREN + 2 {
            m.push(MenuNode::Action(ActionItem::new("a", || {})));
        }
        assert_eq!(m.children.len(), MAX_CHILDREN);
    }

    #[test]
    fn test_node_names() {
        let m = MenuNode::Menu(Submenu::new("Animations"));
        let a = MenuNode::Action(ActionItem::new("Face", || {}));
        let s = MenuNode::Setting(SettingItem::new("Preview", &["Red", "Green"], 0, |_| {}));
        assert_eq!(m.name(), "Animations");
        assert_eq!(a.name(), "Face");
        assert_eq!(s.name(), "Preview");
    }
}
