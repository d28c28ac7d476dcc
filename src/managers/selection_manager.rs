//! Multi-selection of tabs in the panel.
//!
//! The selection is a set of tab ids kept in the order they were added, plus
//! the anchor used by range clicks (the last tab clicked without the range
//! modifier).

use crate::types::command::Command;
use crate::types::tab::TabId;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    /// Toggle the clicked tab (Cmd on macOS).
    pub multi: bool,
    /// Extend over the range from the anchor (Shift).
    pub range: bool,
}

impl ClickModifiers {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn multi() -> Self {
        Self {
            multi: true,
            range: false,
        }
    }

    pub fn range() -> Self {
        Self {
            multi: false,
            range: true,
        }
    }
}

/// What a click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Selection cleared; the clicked tab should become active.
    Activate(TabId),
    /// The clicked tab was toggled in or out of the selection.
    Toggled { tab_id: TabId, selected: bool },
    /// Tabs between the anchor and the clicked tab were added.
    RangeSelected { added: usize },
    /// Nothing changed (the anchor or target is not rendered).
    Ignored,
}

impl ClickOutcome {
    /// Request to send to the background, if any.
    pub fn command(&self) -> Option<Command> {
        match self {
            ClickOutcome::Activate(tab_id) => Some(Command::SwitchTab { tab_id: *tab_id }),
            _ => None,
        }
    }
}

/// Trait defining selection operations.
pub trait SelectionManagerTrait {
    fn click(&mut self, tab_id: TabId, modifiers: ClickModifiers, visible: &[TabId]) -> ClickOutcome;
    fn toggle(&mut self, tab_id: TabId) -> bool;
    fn select_range(&mut self, from: TabId, to: TabId, visible: &[TabId]) -> usize;
    fn target_tab_ids(&self, origin: TabId) -> Vec<TabId>;
    fn clear(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Vec<TabId>,
    anchor: Option<TabId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[TabId] {
        &self.selected
    }

    pub fn is_selected(&self, tab_id: TabId) -> bool {
        self.selected.contains(&tab_id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<TabId> {
        self.anchor
    }

    /// Drops ids for which `keep` returns false, e.g. tabs that have closed.
    pub fn retain(&mut self, mut keep: impl FnMut(TabId) -> bool) {
        self.selected.retain(|id| keep(*id));
        if self.anchor.is_some_and(|id| !keep(id)) {
            self.anchor = None;
        }
    }

    fn insert(&mut self, tab_id: TabId) -> bool {
        if self.is_selected(tab_id) {
            return false;
        }
        self.selected.push(tab_id);
        true
    }
}

impl SelectionManagerTrait for SelectionManager {
    /// Applies a click on `tab_id`. `visible` is the rendered order used for ranges.
    ///
    /// A range click without an anchor behaves like the same click without
    /// the range modifier.
    fn click(&mut self, tab_id: TabId, modifiers: ClickModifiers, visible: &[TabId]) -> ClickOutcome {
        if modifiers.range {
            if let Some(anchor) = self.anchor {
                return match self.select_range(anchor, tab_id, visible) {
                    0 if !visible.contains(&anchor) || !visible.contains(&tab_id) => ClickOutcome::Ignored,
                    added => ClickOutcome::RangeSelected { added },
                };
            }
        }

        if modifiers.multi {
            let selected = self.toggle(tab_id);
            self.anchor = Some(tab_id);
            return ClickOutcome::Toggled { tab_id, selected };
        }

        self.clear();
        self.anchor = Some(tab_id);
        ClickOutcome::Activate(tab_id)
    }

    /// Flips membership of `tab_id`; returns whether it is now selected.
    fn toggle(&mut self, tab_id: TabId) -> bool {
        match self.selected.iter().position(|id| *id == tab_id) {
            Some(pos) => {
                self.selected.remove(pos);
                false
            }
            None => {
                self.selected.push(tab_id);
                true
            }
        }
    }

    /// Adds every tab between `from` and `to` inclusive, in either direction.
    /// Returns how many tabs were newly selected.
    fn select_range(&mut self, from: TabId, to: TabId, visible: &[TabId]) -> usize {
        let (Some(a), Some(b)) = (
            visible.iter().position(|id| *id == from),
            visible.iter().position(|id| *id == to),
        ) else {
            return 0;
        };
        let (start, end) = (a.min(b), a.max(b));
        visible[start..=end]
            .iter()
            .filter(|id| self.insert(**id))
            .count()
    }

    /// Tabs a batch action on `origin` applies to: the whole selection when
    /// `origin` is part of it, otherwise just `origin`.
    fn target_tab_ids(&self, origin: TabId) -> Vec<TabId> {
        if self.is_selected(origin) {
            self.selected.clone()
        } else {
            vec![origin]
        }
    }

    fn clear(&mut self) {
        self.selected.clear();
    }
}
