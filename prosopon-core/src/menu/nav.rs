//! Menu navigation
//!
//! [`MenuNav`] owns the menu tree for the duration of one menu session and
//! tracks the open node as a stack of child indices from the root. Button
//! input mutates cursors and the index path, then the visible node is
//! re-rendered onto the text panel in full.

use heapless::Vec;

use crate::driver::Button;
use crate::text::TextPanel;

use super::{MenuNode, Submenu, MAX_DEPTH};

/// Outcome of one button delivered to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavResult {
    /// Menu remains open
    Stayed,
    /// Back pressed at the root; the caller should close the menu
    Closed,
}

enum SelectStep {
    None,
    Push(u8),
    Pop,
}

/// Navigation session over a menu tree.
pub struct MenuNav {
    root: MenuNode,
    /// Child indices from the root to the open node. Every element but the
    /// last indexes through a submenu; the last may point at a setting.
    path: Vec<u8, MAX_DEPTH>,
}

impl MenuNav {
    pub fn new(root: Submenu) -> Self {
        Self {
            root: MenuNode::Menu(root),
            path: Vec::new(),
        }
    }

    /// Deliver one button press and re-render.
    pub fn handle_button(&mut self, btn: Button, panel: &mut dyn TextPanel) -> NavResult {
        let visible = Self::visible_rows(panel);

        match btn {
            Button::Up => {
                let node = descend(&mut self.root, &self.path);
                if let Some((sel, top, _)) = cursor_mut(node) {
                    if *sel > 0 {
                        *sel -= 1;
                        if *sel < *top {
                            *top = *sel;
                        }
                    }
                }
            }
            Button::Down => {
                let node = descend(&mut self.root, &self.path);
                if let Some((sel, top, len)) = cursor_mut(node) {
                    if (*sel as usize + 1) < len {
                        *sel += 1;
                        if *sel as usize >= *top as usize + visible.saturating_sub(1) {
                            *top += 1;
                        }
                    }
                }
            }
            Button::Menu => {
                let step = self.select(visible);
                match step {
                    SelectStep::Push(i) => {
                        let _ = self.path.push(i);
                    }
                    SelectStep::Pop => {
                        let _ = self.path.pop();
                    }
                    SelectStep::None => {}
                }
            }
            Button::Back => {
                // leaving an open setting discards the uncommitted cursor
                if self.path.pop().is_none() {
                    return NavResult::Closed;
                }
            }
            Button::Reset => {}
        }

        self.render(panel);
        NavResult::Stayed
    }

    // Resolve what the select button does at the current node. Mutations to
    // the path itself happen in the caller, after this borrow ends.
    fn select(&mut self, visible: usize) -> SelectStep {
        let node = descend(&mut self.root, &self.path);
        match node {
            MenuNode::Menu(m) => {
                let idx = m.selected as usize;
                match m.children.get_mut(idx) {
                    Some(MenuNode::Menu(_)) => SelectStep::Push(m.selected),
                    Some(MenuNode::Action(a)) => {
                        (a.invoke)();
                        SelectStep::None
                    }
                    Some(MenuNode::Setting(s)) => {
                        // open with the cursor on the active option
                        s.selected = s.active;
                        if s.selected < s.top {
                            s.top = s.selected;
                        }
                        if s.selected as usize >= s.top as usize + visible {
                            s.top = s.selected + 1 - visible as u8;
                        }
                        SelectStep::Push(m.selected)
                    }
                    None => SelectStep::None,
                }
            }
            MenuNode::Setting(s) => {
                s.active = s.selected;
                (s.apply)(s.selected);
                SelectStep::Pop
            }
            MenuNode::Action(_) => SelectStep::None,
        }
    }

    /// Render the open node onto the panel.
    pub fn render(&mut self, panel: &mut dyn TextPanel) {
        let visible = Self::visible_rows(panel);
        let node = descend(&mut self.root, &self.path);
        match node {
            MenuNode::Menu(m) => {
                let _ = panel.set_line_inverse(0, &m.name);
                for row in 0..visible {
                    let r = (row + 1) as u8;
                    let i = m.top as usize + row;
                    match m.children.get(i) {
                        Some(child) => {
                            let prefix = match child {
                                MenuNode::Menu(_) => '+',
                                MenuNode::Action(_) => '*',
                                MenuNode::Setting(_) => '>',
                            };
                            let line = prefixed(prefix, child.name());
                            if i == m.selected as usize {
                                let _ = panel.set_line_inverse(r, &line);
                            } else {
                                let _ = panel.set_line(r, &line);
                            }
                        }
                        None => {
                            let _ = panel.set_line(r, "");
                        }
                    }
                }
            }
            MenuNode::Setting(s) => {
                let _ = panel.set_line_inverse(0, &s.name);
                for row in 0..visible {
                    let r = (row + 1) as u8;
                    let i = s.top as usize + row;
                    match s.options.get(i) {
                        Some(opt) => {
                            let marker = if i == s.active as usize { '*' } else { ' ' };
                            let line = prefixed(marker, opt);
                            if i == s.selected as usize {
                                let _ = panel.set_line_inverse(r, &line);
                            } else {
                                let _ = panel.set_line(r, &line);
                            }
                        }
                        None => {
                            let _ = panel.set_line(r, "");
                        }
                    }
                }
            }
            MenuNode::Action(_) => {}
        }
    }

    fn visible_rows(panel: &dyn TextPanel) -> usize {
        let (_, rows) = panel.size();
        rows.saturating_sub(1) as usize
    }
}

fn descend<'a>(node: &'a mut MenuNode, path: &[u8]) -> &'a mut MenuNode {
    match path.split_first() {
        Some((&i, rest)) => match node {
            MenuNode::Menu(m) => descend(&mut m.children[i as usize], rest),
            leaf => leaf,
        },
        None => node,
    }
}

fn cursor_mut(node: &mut MenuNode) -> Option<(&mut u8, &mut u8, usize)> {
    match node {
        MenuNode::Menu(m) => {
            let len = m.children.len();
            Some((&mut m.selected, &mut m.top, len))
        }
        MenuNode::Setting(s) => {
            let len = s.options.len();
            Some((&mut s.selected, &mut s.top, len))
        }
        MenuNode::Action(_) => None,
    }
}

fn prefixed(prefix: char, name: &str) -> heapless::String<26> {
    let mut line = heapless::String::new();
    let _ = line.push(prefix);
    let _ = line.push_str(name);
    line
}
