use serde::{Deserialize, Serialize};

use super::group::GroupColor;
use super::tab::{GroupId, Tab, TabId};

/// A group as presented in a snapshot, with its member tabs in host order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub id: GroupId,
    pub title: String,
    pub color: GroupColor,
    pub collapsed: bool,
    pub tabs: Vec<Tab>,
    /// Lowest position among member tabs; `None` for a group with no members.
    pub first_tab_index: Option<usize>,
}

impl GroupView {
    /// Key used to order groups on screen. Memberless groups sort last.
    pub fn sort_key(&self) -> usize {
        self.first_tab_index.unwrap_or(usize::MAX)
    }

    /// Highest position among member tabs.
    pub fn last_tab_index(&self) -> Option<usize> {
        self.tabs.iter().map(|t| t.index).max()
    }
}

/// Point-in-time grouped view of one window's tabs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub groups: Vec<GroupView>,
    pub ungrouped_tabs: Vec<Tab>,
    pub total_count: usize,
}

impl TabSnapshot {
    /// Finds a tab anywhere in the snapshot.
    pub fn find_tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.groups
            .iter()
            .flat_map(|g| g.tabs.iter())
            .chain(self.ungrouped_tabs.iter())
            .find(|t| t.id == tab_id)
    }

    pub fn find_group(&self, group_id: GroupId) -> Option<&GroupView> {
        self.groups.iter().find(|g| g.id == group_id)
    }
}
