use serde::{Deserialize, Serialize};

use super::group::GroupColor;

/// Default cap on per-window MRU history entries.
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Default quiet period before a search re-render fires.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 150;

/// Top-level panel settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PanelSettings {
    pub general: GeneralSettings,
    pub history: HistorySettings,
    pub search: SearchSettings,
    pub groups: GroupSettings,
}

/// General panel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

/// MRU history settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_HISTORY_CAP,
        }
    }
}

/// Search box settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

/// Settings applied when creating a new group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GroupSettings {
    /// Fixed color for new groups. `None` picks one at random.
    pub default_color: Option<GroupColor>,
}
