use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier. Ids are reused after a tab closes.
pub type TabId = i32;

/// Host-assigned window identifier.
pub type WindowId = i32;

/// Host-assigned tab group identifier.
pub type GroupId = i32;

/// A browser tab as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Position within the window. Dense and zero-based, but invalidated by any reorder.
    pub index: usize,
}

impl Tab {
    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }
}

/// Which tabs a host query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabQuery {
    Window(WindowId),
    Group(GroupId),
}

/// Partial update applied through `TabHost::update_tab`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub active: Option<bool>,
    pub pinned: Option<bool>,
}

impl TabUpdate {
    pub fn activate() -> Self {
        Self {
            active: Some(true),
            ..Self::default()
        }
    }

    pub fn pinned(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
            ..Self::default()
        }
    }
}

/// Fields reported as changed by a tab-updated notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    /// Load state such as `"loading"` or `"complete"`. Never shown in the
    /// panel, so `affects_listing` ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TabChange {
    /// Whether the change alters anything the panel displays.
    pub fn affects_listing(&self) -> bool {
        self.title.is_some() || self.url.is_some() || self.fav_icon_url.is_some() || self.pinned.is_some()
    }
}
