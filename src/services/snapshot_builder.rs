//! Snapshot Builder: assembles a window's flat tab list into a grouped view.

use std::collections::HashMap;

use crate::host::TabHost;
use crate::types::errors::HostError;
use crate::types::group::TabGroup;
use crate::types::snapshot::{GroupView, TabSnapshot};
use crate::types::tab::{GroupId, Tab, TabQuery, WindowId};

/// Placeholder titles substituted for empty host values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub unnamed_group: String,
    pub untitled_tab: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            unnamed_group: "Unnamed group".to_string(),
            untitled_tab: "New tab".to_string(),
        }
    }
}

/// Reads all tabs and groups of `window_id` and builds a fresh snapshot.
///
/// Any host error aborts the whole build; nothing is cached between calls.
pub async fn build_snapshot<H: TabHost>(
    host: &H,
    window_id: WindowId,
    placeholders: &Placeholders,
) -> Result<TabSnapshot, HostError> {
    let tabs = host.query_tabs(TabQuery::Window(window_id)).await?;
    let groups = host.query_groups(window_id).await?;
    Ok(assemble(tabs, groups, placeholders))
}

/// Partitions `tabs` by membership in `groups` and orders groups by their first member.
pub fn assemble(tabs: Vec<Tab>, groups: Vec<TabGroup>, placeholders: &Placeholders) -> TabSnapshot {
    let total_count = tabs.len();

    let mut views: Vec<GroupView> = groups
        .into_iter()
        .map(|g| GroupView {
            id: g.id,
            title: if g.title.is_empty() {
                placeholders.unnamed_group.clone()
            } else {
                g.title
            },
            color: g.color,
            collapsed: g.collapsed,
            tabs: Vec::new(),
            first_tab_index: None,
        })
        .collect();
    let slot: HashMap<GroupId, usize> = views.iter().enumerate().map(|(i, g)| (g.id, i)).collect();

    let mut ungrouped_tabs = Vec::new();
    for mut tab in tabs {
        if tab.title.is_empty() {
            tab.title = placeholders.untitled_tab.clone();
        }
        match tab.group_id.and_then(|gid| slot.get(&gid)) {
            Some(&i) => {
                let view = &mut views[i];
                view.first_tab_index = Some(match view.first_tab_index {
                    Some(first) => first.min(tab.index),
                    None => tab.index,
                });
                view.tabs.push(tab);
            }
            None => ungrouped_tabs.push(tab),
        }
    }

    views.sort_by_key(GroupView::sort_key);

    TabSnapshot {
        groups: views,
        ungrouped_tabs,
        total_count,
    }
}
