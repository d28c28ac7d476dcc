//! Search filtering and the render model derived from a snapshot.
//!
//! `build_view` applies the search box to a `TabSnapshot` and produces the
//! rows the panel draws, in on-screen order. Range selection walks the same
//! order through `PanelView::visible_tab_ids`.

use std::time::{Duration, Instant};

use serde::Serialize;
use url::Url;

use crate::types::group::GroupColor;
use crate::types::snapshot::TabSnapshot;
use crate::types::tab::{GroupId, Tab, TabId};

/// Lowercased, trimmed form of the raw search box contents.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Case-insensitive substring match on title or url. `query` must be normalized.
pub fn matches(tab: &Tab, query: &str) -> bool {
    query.is_empty()
        || tab.title.to_lowercase().contains(query)
        || tab.url.to_lowercase().contains(query)
}

/// Tabs matching `query`, in their original order.
pub fn filter_tabs<'a>(tabs: &'a [Tab], query: &str) -> Vec<&'a Tab> {
    tabs.iter().filter(|t| matches(t, query)).collect()
}

/// Host part of `url`, or the raw string when it has none or does not parse.
pub fn display_domain(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// One tab line as drawn in the panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRow {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub fav_icon_url: Option<String>,
    pub active: bool,
    pub pinned: bool,
    pub group_id: Option<GroupId>,
    pub index: usize,
}

impl From<&Tab> for TabRow {
    fn from(tab: &Tab) -> Self {
        Self {
            id: tab.id,
            title: tab.title.clone(),
            url: tab.url.clone(),
            domain: display_domain(&tab.url),
            fav_icon_url: tab.fav_icon_url.clone(),
            active: tab.active,
            pinned: tab.pinned,
            group_id: tab.group_id,
            index: tab.index,
        }
    }
}

/// A group header plus the rows rendered beneath it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupRow {
    pub id: GroupId,
    pub title: String,
    pub color: GroupColor,
    /// Collapsed as drawn. Always false while searching.
    pub collapsed: bool,
    /// Member count of the whole group, not just the matching rows.
    pub tab_count: usize,
    pub tabs: Vec<TabRow>,
}

/// Everything the panel renders for one snapshot and search query.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub groups: Vec<GroupRow>,
    pub ungrouped: Vec<TabRow>,
    /// The "ungrouped" divider is drawn only when the window has groups.
    pub show_ungrouped_header: bool,
    /// Nothing to draw; the "no matches" placeholder takes the list's place.
    pub is_empty: bool,
    pub searching: bool,
}

impl PanelView {
    /// Rendered tab ids top to bottom, including rows inside collapsed groups.
    pub fn visible_tab_ids(&self) -> Vec<TabId> {
        self.groups
            .iter()
            .flat_map(|g| g.tabs.iter())
            .chain(self.ungrouped.iter())
            .map(|row| row.id)
            .collect()
    }

    pub fn row(&self, tab_id: TabId) -> Option<&TabRow> {
        self.groups
            .iter()
            .flat_map(|g| g.tabs.iter())
            .chain(self.ungrouped.iter())
            .find(|row| row.id == tab_id)
    }
}

/// Builds the render model for `snapshot` filtered by the raw search text.
pub fn build_view(snapshot: &TabSnapshot, raw_query: &str) -> PanelView {
    let query = normalize_query(raw_query);
    let searching = !query.is_empty();

    let groups: Vec<GroupRow> = snapshot
        .groups
        .iter()
        .filter_map(|group| {
            let rows: Vec<TabRow> = filter_tabs(&group.tabs, &query)
                .into_iter()
                .map(TabRow::from)
                .collect();
            if searching && rows.is_empty() {
                return None;
            }
            Some(GroupRow {
                id: group.id,
                title: group.title.clone(),
                color: group.color,
                collapsed: group.collapsed && !searching,
                tab_count: group.tabs.len(),
                tabs: rows,
            })
        })
        .collect();

    let ungrouped: Vec<TabRow> = filter_tabs(&snapshot.ungrouped_tabs, &query)
        .into_iter()
        .map(TabRow::from)
        .collect();

    PanelView {
        show_ungrouped_header: !ungrouped.is_empty() && !snapshot.groups.is_empty(),
        is_empty: groups.is_empty() && ungrouped.is_empty(),
        groups,
        ungrouped,
        searching,
    }
}

/// Trailing-edge debouncer for the search box.
///
/// Each keystroke pushes the deadline back; the search fires once after the
/// input has been quiet for `wait`.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl SearchDebouncer {
    pub fn new(wait: Duration) -> Self {
        Self { wait, deadline: None }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Records a keystroke at `now`.
    pub fn input(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    /// When the pending search will fire, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once per burst of input, when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops any pending search.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
