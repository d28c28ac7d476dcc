//! Per-window panel bookkeeping.
//!
//! `PanelState` owns the last snapshot, the rendered view, the search query,
//! the selection and any drag in progress. User gestures come in as method
//! calls and go out as `Command`s for the background; nothing here talks to
//! the host directly.

use std::time::{Duration, Instant};

use log::debug;

use crate::managers::drag_manager::{DragManager, DropIndicator, DropTarget};
use crate::managers::selection_manager::{
    ClickModifiers, ClickOutcome, SelectionManager, SelectionManagerTrait,
};
use crate::services::localization_engine::LocalizationEngineTrait;
use crate::services::search_filter::{build_view, PanelView, SearchDebouncer};
use crate::types::command::Command;
use crate::types::errors::DragError;
use crate::types::event::HostEvent;
use crate::types::group::GroupColor;
use crate::types::settings::PanelSettings;
use crate::types::snapshot::TabSnapshot;
use crate::types::tab::{GroupId, TabId, WindowId};

/// Entry in the "add to group" submenu.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupChoice {
    pub id: GroupId,
    pub title: String,
    pub color: GroupColor,
}

/// Tab context menu contents for a right-click on one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabMenu {
    pub origin: TabId,
    pub targets: Vec<TabId>,
    /// "N tabs" header, shown only for more than one target.
    pub targets_label: Option<String>,
    /// Pin or unpin label. Absent when the menu applies to several tabs.
    pub pin_label: Option<String>,
    pub can_remove_from_group: bool,
    /// Groups other than the origin tab's own.
    pub other_groups: Vec<GroupChoice>,
}

/// Group context menu contents.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMenu {
    pub group_id: GroupId,
    pub collapsed: bool,
    pub collapse_label: String,
}

/// Entries of the tab context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAction {
    Reload,
    CopyLinks,
    TogglePin,
    Close,
    RemoveFromGroup,
    CreateGroup,
    AddToGroup(GroupId),
}

/// Entries of the group context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupAction {
    Rename(String),
    ToggleCollapsed,
    Ungroup,
    CloseTabs,
    ChangeColor(GroupColor),
}

/// Result of a menu action: requests to send and text for the clipboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionPlan {
    pub commands: Vec<Command>,
    pub clipboard: Option<String>,
}

pub struct PanelState {
    window_id: WindowId,
    snapshot: TabSnapshot,
    view: PanelView,
    query: String,
    pending_query: String,
    debouncer: SearchDebouncer,
    selection: SelectionManager,
    drag: DragManager,
}

impl PanelState {
    pub fn new(window_id: WindowId, debounce: Duration) -> Self {
        Self::with_debouncer(window_id, SearchDebouncer::new(debounce))
    }

    /// Panel for `window_id` with the search quiet period taken from `settings`.
    pub fn from_settings(window_id: WindowId, settings: &PanelSettings) -> Self {
        Self::with_debouncer(window_id, SearchDebouncer::from_millis(settings.search.debounce_ms))
    }

    fn with_debouncer(window_id: WindowId, debouncer: SearchDebouncer) -> Self {
        Self {
            window_id,
            snapshot: TabSnapshot::default(),
            view: PanelView {
                is_empty: true,
                ..PanelView::default()
            },
            query: String::new(),
            pending_query: String::new(),
            debouncer,
            selection: SelectionManager::new(),
            drag: DragManager::new(),
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn snapshot(&self) -> &TabSnapshot {
        &self.snapshot
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn drag(&self) -> &DragManager {
        &self.drag
    }

    /// Request that fetches a fresh snapshot for this window.
    pub fn refresh_command(&self) -> Command {
        Command::GetTabs {
            window_id: self.window_id,
        }
    }

    /// Replaces the snapshot and re-renders. Selected tabs that are gone are dropped.
    pub fn apply_snapshot(&mut self, snapshot: TabSnapshot) {
        self.snapshot = snapshot;
        let snapshot = &self.snapshot;
        self.selection.retain(|id| snapshot.find_tab(id).is_some());
        self.rerender();
    }

    /// Whether `event` makes the current snapshot stale.
    pub fn on_host_event(&self, event: &HostEvent) -> bool {
        event.invalidates_listing()
    }

    // --- search ---

    /// Records a keystroke in the search box. The view updates on `poll_search`.
    pub fn set_query(&mut self, raw: &str, now: Instant) {
        self.pending_query = raw.to_string();
        self.debouncer.input(now);
    }

    /// Applies the pending query once the debounce period has passed.
    /// Returns true when the view was rebuilt.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        if !self.debouncer.poll(now) {
            return false;
        }
        self.query = std::mem::take(&mut self.pending_query);
        self.rerender();
        true
    }

    pub fn search_debounce(&self) -> Duration {
        self.debouncer.wait()
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    fn rerender(&mut self) {
        self.view = build_view(&self.snapshot, &self.query);
    }

    // --- selection ---

    /// Handles a click on a tab row; returns the request to send, if any.
    pub fn click(&mut self, tab_id: TabId, modifiers: ClickModifiers) -> Option<Command> {
        let visible = self.view.visible_tab_ids();
        let outcome = self.selection.click(tab_id, modifiers, &visible);
        if outcome == ClickOutcome::Ignored {
            debug!("Range click on {} ignored", tab_id);
        }
        outcome.command()
    }

    pub fn target_tab_ids(&self, origin: TabId) -> Vec<TabId> {
        self.selection.target_tab_ids(origin)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// "N tabs selected", or `None` with an empty selection.
    pub fn selection_label(&self, l10n: &impl LocalizationEngineTrait) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        Some(l10n.plural("selection.count", self.selection.len() as u64, None))
    }

    pub fn tab_count_label(&self, l10n: &impl LocalizationEngineTrait) -> String {
        l10n.plural("tabs.count", self.snapshot.total_count as u64, None)
    }

    // --- context menus ---

    /// Builds the tab context menu for a right-click on `origin`.
    pub fn tab_menu(&self, origin: TabId, l10n: &impl LocalizationEngineTrait) -> Option<TabMenu> {
        let tab = self.snapshot.find_tab(origin)?;
        let targets = self.target_tab_ids(origin);
        let multiple = targets.len() > 1;

        let targets_label = multiple.then(|| l10n.plural("menu.targets", targets.len() as u64, None));
        let pin_label = (!multiple).then(|| {
            let key = if tab.pinned { "menu.unpin" } else { "menu.pin" };
            l10n.t(key, None)
        });
        let other_groups = self
            .snapshot
            .groups
            .iter()
            .filter(|g| Some(g.id) != tab.group_id)
            .map(|g| GroupChoice {
                id: g.id,
                title: g.title.clone(),
                color: g.color,
            })
            .collect();

        Some(TabMenu {
            origin,
            targets,
            targets_label,
            pin_label,
            can_remove_from_group: tab.is_grouped(),
            other_groups,
        })
    }

    pub fn group_menu(&self, group_id: GroupId, l10n: &impl LocalizationEngineTrait) -> Option<GroupMenu> {
        let group = self.snapshot.find_group(group_id)?;
        let collapse_label = if group.collapsed {
            l10n.t("menu.expand_group", None)
        } else {
            l10n.t("menu.collapse_group", None)
        };
        Some(GroupMenu {
            group_id,
            collapsed: group.collapsed,
            collapse_label,
        })
    }

    /// Runs a tab menu action on `origin` (and the selection, when `origin` is in it).
    ///
    /// The selection is cleared afterwards.
    pub fn tab_action(
        &mut self,
        origin: TabId,
        action: TabAction,
        l10n: &impl LocalizationEngineTrait,
        new_group_color: GroupColor,
    ) -> ActionPlan {
        let targets = self.target_tab_ids(origin);
        let mut plan = ActionPlan::default();

        match action {
            TabAction::Reload => {
                plan.commands = targets
                    .iter()
                    .map(|&tab_id| Command::ReloadTab { tab_id })
                    .collect();
            }
            TabAction::CopyLinks => {
                let urls: Vec<&str> = targets
                    .iter()
                    .filter_map(|&id| self.snapshot.find_tab(id))
                    .map(|t| t.url.as_str())
                    .filter(|url| !url.is_empty())
                    .collect();
                if !urls.is_empty() {
                    plan.clipboard = Some(urls.join("\n"));
                }
            }
            // Pin acts on the right-clicked tab only.
            TabAction::TogglePin => plan.commands.push(Command::TogglePin { tab_id: origin }),
            TabAction::Close => {
                plan.commands = targets
                    .iter()
                    .map(|&tab_id| Command::CloseTab { tab_id })
                    .collect();
            }
            TabAction::RemoveFromGroup => {
                plan.commands = targets
                    .iter()
                    .map(|&tab_id| Command::RemoveTabFromGroup { tab_id })
                    .collect();
            }
            TabAction::CreateGroup => plan.commands.push(Command::CreateGroupWithTabs {
                tab_ids: targets,
                title: Some(l10n.t("groups.new_group", None)),
                color: Some(new_group_color),
            }),
            TabAction::AddToGroup(group_id) => plan.commands.push(Command::AddTabsToGroup {
                tab_ids: targets,
                group_id,
            }),
        }

        self.selection.clear();
        plan
    }

    /// Runs a group menu action. Renames to a blank title produce nothing.
    pub fn group_action(&self, group_id: GroupId, action: GroupAction) -> Option<Command> {
        match action {
            GroupAction::Rename(raw) => {
                let title = raw.trim();
                if title.is_empty() {
                    return None;
                }
                Some(Command::RenameGroup {
                    group_id,
                    title: title.to_string(),
                })
            }
            GroupAction::ToggleCollapsed => {
                let group = self.snapshot.find_group(group_id)?;
                Some(Command::ToggleGroupCollapsed {
                    group_id,
                    collapsed: !group.collapsed,
                })
            }
            GroupAction::Ungroup => Some(Command::Ungroup { group_id }),
            GroupAction::CloseTabs => Some(Command::CloseGroupTabs { group_id }),
            GroupAction::ChangeColor(color) => Some(Command::ChangeGroupColor { group_id, color }),
        }
    }

    /// Collapses every group if any is expanded, otherwise expands them all.
    pub fn toggle_all_groups(&self) -> Vec<Command> {
        let collapse = self.snapshot.groups.iter().any(|g| !g.collapsed);
        self.snapshot
            .groups
            .iter()
            .map(|g| Command::ToggleGroupCollapsed {
                group_id: g.id,
                collapsed: collapse,
            })
            .collect()
    }

    /// Closes one tab from its row's close button.
    pub fn close_button(&self, tab_id: TabId) -> Command {
        Command::CloseTab { tab_id }
    }

    // --- drag and drop ---

    pub fn start_tab_drag(&mut self, tab_id: TabId) -> Result<(), DragError> {
        self.drag.start_tab(tab_id, &self.snapshot)
    }

    pub fn start_group_drag(&mut self, group_id: GroupId) -> Result<(), DragError> {
        self.drag.start_group(group_id, &self.snapshot)
    }

    pub fn drag_over(&self, target: DropTarget) -> Option<DropIndicator> {
        self.drag.hover(target)
    }

    pub fn drop_on(&mut self, target: DropTarget) -> Option<Command> {
        self.drag.drop(target, &self.snapshot)
    }

    pub fn end_drag(&mut self) {
        self.drag.end();
    }
}
