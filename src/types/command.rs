use serde::{Deserialize, Serialize};

use super::group::{GroupColor, GroupTarget};
use super::snapshot::TabSnapshot;
use super::tab::{GroupId, TabId, WindowId};

/// A request sent from the panel to the background coordinator.
///
/// Serialized as `{"type": "MOVE_TAB", "tabId": 3, ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    GetTabs {
        window_id: WindowId,
    },
    SwitchTab {
        tab_id: TabId,
    },
    SwitchToPreviousTab {
        window_id: WindowId,
    },
    CloseTab {
        tab_id: TabId,
    },
    CloseOtherTabs {
        tab_id: TabId,
        window_id: WindowId,
    },
    CloseTabsToRight {
        tab_id: TabId,
        window_id: WindowId,
    },
    TogglePin {
        tab_id: TabId,
    },
    ReloadTab {
        tab_id: TabId,
    },
    DuplicateTab {
        tab_id: TabId,
    },
    ToggleGroupCollapsed {
        group_id: GroupId,
        collapsed: bool,
    },
    AddTabToGroup {
        tab_id: TabId,
        group_id: GroupId,
    },
    AddTabsToGroup {
        tab_ids: Vec<TabId>,
        group_id: GroupId,
    },
    CreateGroupWithTab {
        tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<GroupColor>,
    },
    CreateGroupWithTabs {
        tab_ids: Vec<TabId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<GroupColor>,
    },
    RemoveTabFromGroup {
        tab_id: TabId,
    },
    MoveTab {
        tab_id: TabId,
        /// Negative values are treated as absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_index: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_group_id: Option<GroupTarget>,
    },
    RenameGroup {
        group_id: GroupId,
        title: String,
    },
    ChangeGroupColor {
        group_id: GroupId,
        color: GroupColor,
    },
    CloseGroupTabs {
        group_id: GroupId,
    },
    Ungroup {
        group_id: GroupId,
    },
    MoveGroup {
        group_id: GroupId,
        target_index: usize,
    },
}

impl Command {
    /// Wire name of the command, used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetTabs { .. } => "GET_TABS",
            Command::SwitchTab { .. } => "SWITCH_TAB",
            Command::SwitchToPreviousTab { .. } => "SWITCH_TO_PREVIOUS_TAB",
            Command::CloseTab { .. } => "CLOSE_TAB",
            Command::CloseOtherTabs { .. } => "CLOSE_OTHER_TABS",
            Command::CloseTabsToRight { .. } => "CLOSE_TABS_TO_RIGHT",
            Command::TogglePin { .. } => "TOGGLE_PIN",
            Command::ReloadTab { .. } => "RELOAD_TAB",
            Command::DuplicateTab { .. } => "DUPLICATE_TAB",
            Command::ToggleGroupCollapsed { .. } => "TOGGLE_GROUP_COLLAPSED",
            Command::AddTabToGroup { .. } => "ADD_TAB_TO_GROUP",
            Command::AddTabsToGroup { .. } => "ADD_TABS_TO_GROUP",
            Command::CreateGroupWithTab { .. } => "CREATE_GROUP_WITH_TAB",
            Command::CreateGroupWithTabs { .. } => "CREATE_GROUP_WITH_TABS",
            Command::RemoveTabFromGroup { .. } => "REMOVE_TAB_FROM_GROUP",
            Command::MoveTab { .. } => "MOVE_TAB",
            Command::RenameGroup { .. } => "RENAME_GROUP",
            Command::ChangeGroupColor { .. } => "CHANGE_GROUP_COLOR",
            Command::CloseGroupTabs { .. } => "CLOSE_GROUP_TABS",
            Command::Ungroup { .. } => "UNGROUP",
            Command::MoveGroup { .. } => "MOVE_GROUP",
        }
    }
}

/// Successful result of a dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    Snapshot(TabSnapshot),
    Switched(TabId),
    GroupCreated(GroupId),
}
