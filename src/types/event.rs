use serde::{Deserialize, Serialize};

use super::group::TabGroup;
use super::tab::{Tab, TabChange, TabId, WindowId};

/// Change notification delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    TabCreated { tab: Tab },
    TabRemoved { tab_id: TabId, window_id: WindowId, window_closing: bool },
    TabUpdated { tab_id: TabId, change: TabChange },
    TabActivated { tab_id: TabId, window_id: WindowId },
    TabMoved { tab_id: TabId, window_id: WindowId, from_index: usize, to_index: usize },
    TabAttached { tab_id: TabId, new_window_id: WindowId, new_position: usize },
    TabDetached { tab_id: TabId, old_window_id: WindowId, old_position: usize },
    GroupCreated { group: TabGroup },
    GroupRemoved { group: TabGroup },
    GroupUpdated { group: TabGroup },
    WindowRemoved { window_id: WindowId },
}

impl HostEvent {
    /// Whether the panel's last snapshot is stale after this event.
    pub fn invalidates_listing(&self) -> bool {
        match self {
            HostEvent::TabUpdated { change, .. } => change.affects_listing(),
            HostEvent::WindowRemoved { .. } => false,
            _ => true,
        }
    }
}
