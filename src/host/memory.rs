//! In-memory host for the tab sidebar.
//!
//! Keeps windows, tabs, and groups in plain Rust collections and applies the
//! same ordering rules a browser does: pinned tabs stay left, grouped tabs stay
//! contiguous, positions are dense per window. Every call is recorded and every
//! mutation queues a `HostEvent`, so tests can assert on both.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::TabHost;
use crate::types::errors::HostError;
use crate::types::event::HostEvent;
use crate::types::group::{GroupColor, GroupUpdate, TabGroup};
use crate::types::tab::{GroupId, Tab, TabChange, TabId, TabQuery, TabUpdate, WindowId};

/// Load status reported while a reloaded tab fetches its page.
const LOADING: &str = "loading";

/// Host operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    QueryTabs,
    QueryGroups,
    GetTab,
    UpdateTab,
    MoveTabs,
    RemoveTabs,
    ReloadTab,
    DuplicateTab,
    GroupTabs,
    UngroupTabs,
    UpdateGroup,
}

/// A recorded call against the host, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    QueryTabs(TabQuery),
    QueryGroups(WindowId),
    GetTab(TabId),
    UpdateTab(TabId, TabUpdate),
    MoveTabs(Vec<TabId>, usize),
    RemoveTabs(Vec<TabId>),
    ReloadTab(TabId),
    DuplicateTab(TabId),
    GroupTabs(Vec<TabId>, Option<GroupId>),
    UngroupTabs(Vec<TabId>),
    UpdateGroup(GroupId, GroupUpdate),
}

impl HostCall {
    pub fn op(&self) -> HostOp {
        match self {
            HostCall::QueryTabs(_) => HostOp::QueryTabs,
            HostCall::QueryGroups(_) => HostOp::QueryGroups,
            HostCall::GetTab(_) => HostOp::GetTab,
            HostCall::UpdateTab(..) => HostOp::UpdateTab,
            HostCall::MoveTabs(..) => HostOp::MoveTabs,
            HostCall::RemoveTabs(_) => HostOp::RemoveTabs,
            HostCall::ReloadTab(_) => HostOp::ReloadTab,
            HostCall::DuplicateTab(_) => HostOp::DuplicateTab,
            HostCall::GroupTabs(..) => HostOp::GroupTabs,
            HostCall::UngroupTabs(_) => HostOp::UngroupTabs,
            HostCall::UpdateGroup(..) => HostOp::UpdateGroup,
        }
    }
}

/// Initial host contents, as loaded from a JSON fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostFixture {
    pub tabs: Vec<Tab>,
    pub groups: Vec<TabGroup>,
}

#[derive(Default)]
struct HostState {
    tabs: HashMap<TabId, Tab>,
    /// Tab ids per window in position order.
    order: BTreeMap<WindowId, Vec<TabId>>,
    groups: BTreeMap<GroupId, TabGroup>,
    next_tab_id: TabId,
    next_group_id: GroupId,
    rejections: HashMap<HostOp, String>,
    rejected_removals: HashSet<TabId>,
    calls: Vec<HostCall>,
    events: Vec<HostEvent>,
    reloads: Vec<TabId>,
}

/// `TabHost` backed by in-memory state.
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                next_tab_id: 1,
                next_group_id: 1,
                ..HostState::default()
            }),
        }
    }

    /// Builds a host from a fixture. Tabs are ordered per window by their `index`.
    ///
    /// Each active tab queues a `TabActivated` event so a coordinator draining
    /// events starts with a one-entry history per window.
    pub fn from_fixture(fixture: HostFixture) -> Self {
        let host = Self::new();
        {
            let mut st = host.lock();
            let mut tabs = fixture.tabs;
            tabs.sort_by_key(|t| (t.window_id, t.index));
            for tab in tabs {
                if tab.active {
                    st.events.push(HostEvent::TabActivated {
                        tab_id: tab.id,
                        window_id: tab.window_id,
                    });
                }
                st.next_tab_id = st.next_tab_id.max(tab.id + 1);
                st.order.entry(tab.window_id).or_default().push(tab.id);
                st.tabs.insert(tab.id, tab);
            }
            for group in fixture.groups {
                st.next_group_id = st.next_group_id.max(group.id + 1);
                st.groups.insert(group.id, group);
            }
            let windows: Vec<WindowId> = st.order.keys().copied().collect();
            for window_id in windows {
                st.reindex(window_id);
            }
        }
        host
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a tab at the end of `window_id` and returns its id.
    pub fn open_tab(&self, window_id: WindowId, title: &str, url: &str) -> TabId {
        let mut st = self.lock();
        let id = st.next_tab_id;
        st.next_tab_id += 1;
        let index = st.order.get(&window_id).map_or(0, Vec::len);
        let is_first = index == 0;
        let tab = Tab {
            id,
            window_id,
            title: title.to_string(),
            url: url.to_string(),
            fav_icon_url: None,
            active: is_first,
            pinned: false,
            group_id: None,
            index,
        };
        st.order.entry(window_id).or_default().push(id);
        st.tabs.insert(id, tab.clone());
        st.events.push(HostEvent::TabCreated { tab });
        if is_first {
            st.events.push(HostEvent::TabActivated { tab_id: id, window_id });
        }
        id
    }

    /// Makes every future call of `op` fail with `message`.
    pub fn reject(&self, op: HostOp, message: &str) {
        self.lock().rejections.insert(op, message.to_string());
    }

    /// Clears a rejection installed with `reject`.
    pub fn accept(&self, op: HostOp) {
        self.lock().rejections.remove(&op);
    }

    /// Makes `remove_tabs` fail whenever it includes `tab_id`.
    pub fn reject_removal_of(&self, tab_id: TabId) {
        self.lock().rejected_removals.insert(tab_id);
    }

    /// Drops a tab without queueing any event, as if the notification was missed.
    pub fn forget_tab(&self, tab_id: TabId) {
        let mut st = self.lock();
        if let Some(tab) = st.tabs.remove(&tab_id) {
            if let Some(order) = st.order.get_mut(&tab.window_id) {
                order.retain(|id| *id != tab_id);
            }
            st.reindex(tab.window_id);
            let queued = st.events.len();
            st.prune_empty_groups();
            st.events.truncate(queued);
        }
    }

    /// Tabs of `window_id` in position order.
    pub fn tabs_in(&self, window_id: WindowId) -> Vec<Tab> {
        self.lock().window_tabs(window_id)
    }

    pub fn tab(&self, tab_id: TabId) -> Option<Tab> {
        self.lock().tabs.get(&tab_id).cloned()
    }

    pub fn group(&self, group_id: GroupId) -> Option<TabGroup> {
        self.lock().groups.get(&group_id).cloned()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    /// Tabs reloaded so far, in order.
    pub fn reloads(&self) -> Vec<TabId> {
        self.lock().reloads.clone()
    }

    /// Drains queued change notifications.
    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut self.lock().events)
    }

    /// Records `call` and fails if its operation has been rejected.
    fn begin(&self, call: HostCall) -> Result<MutexGuard<'_, HostState>, HostError> {
        let mut st = self.lock();
        let op = call.op();
        st.calls.push(call);
        if let Some(message) = st.rejections.get(&op) {
            return Err(HostError::Rejected(message.clone()));
        }
        Ok(st)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostState {
    fn reindex(&mut self, window_id: WindowId) {
        let ids = self.order.get(&window_id).cloned().unwrap_or_default();
        for (index, id) in ids.iter().enumerate() {
            if let Some(tab) = self.tabs.get_mut(id) {
                tab.index = index;
            }
        }
    }

    fn window_tabs(&self, window_id: WindowId) -> Vec<Tab> {
        self.order
            .get(&window_id)
            .map(|ids| ids.iter().filter_map(|id| self.tabs.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    fn require_tab(&self, tab_id: TabId) -> Result<&Tab, HostError> {
        self.tabs.get(&tab_id).ok_or(HostError::TabNotFound(tab_id))
    }

    /// Checks every id exists and all share one window, which is returned.
    fn require_same_window(&self, tab_ids: &[TabId]) -> Result<WindowId, HostError> {
        let mut window = None;
        for id in tab_ids {
            let tab = self.require_tab(*id)?;
            match window {
                None => window = Some(tab.window_id),
                Some(w) if w != tab.window_id => {
                    return Err(HostError::Rejected(
                        "Tabs must belong to the same window".to_string(),
                    ))
                }
                Some(_) => {}
            }
        }
        window.ok_or_else(|| HostError::Rejected("No tabs given".to_string()))
    }

    fn pinned_count(&self, window_id: WindowId) -> usize {
        self.window_tabs(window_id).iter().filter(|t| t.pinned).count()
    }

    /// Removes `tab_ids` from the window order and reinserts them, in order, at `index`.
    fn reposition(&mut self, window_id: WindowId, tab_ids: &[TabId], index: usize) {
        let Some(order) = self.order.get_mut(&window_id) else {
            return;
        };
        order.retain(|id| !tab_ids.contains(id));
        let at = index.min(order.len());
        for (offset, id) in tab_ids.iter().enumerate() {
            order.insert(at + offset, *id);
        }
        self.reindex(window_id);
    }

    fn prune_empty_groups(&mut self) {
        let live: HashSet<GroupId> = self.tabs.values().filter_map(|t| t.group_id).collect();
        let dead: Vec<GroupId> = self
            .groups
            .keys()
            .copied()
            .filter(|id| !live.contains(id))
            .collect();
        for id in dead {
            if let Some(group) = self.groups.remove(&id) {
                self.events.push(HostEvent::GroupRemoved { group });
            }
        }
    }

    fn activate(&mut self, window_id: WindowId, tab_id: TabId) {
        for id in self.order.get(&window_id).cloned().unwrap_or_default() {
            if let Some(tab) = self.tabs.get_mut(&id) {
                tab.active = id == tab_id;
            }
        }
        self.events.push(HostEvent::TabActivated { tab_id, window_id });
    }
}

impl TabHost for MemoryHost {
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<Tab>, HostError> {
        let st = self.begin(HostCall::QueryTabs(query))?;
        match query {
            TabQuery::Window(window_id) => Ok(st.window_tabs(window_id)),
            TabQuery::Group(group_id) => {
                let mut tabs: Vec<Tab> = st
                    .tabs
                    .values()
                    .filter(|t| t.group_id == Some(group_id))
                    .cloned()
                    .collect();
                tabs.sort_by_key(|t| (t.window_id, t.index));
                Ok(tabs)
            }
        }
    }

    async fn query_groups(&self, window_id: WindowId) -> Result<Vec<TabGroup>, HostError> {
        let st = self.begin(HostCall::QueryGroups(window_id))?;
        Ok(st
            .groups
            .values()
            .filter(|g| g.window_id == window_id)
            .cloned()
            .collect())
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError> {
        let st = self.begin(HostCall::GetTab(tab_id))?;
        st.require_tab(tab_id).cloned()
    }

    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> Result<Tab, HostError> {
        let mut st = self.begin(HostCall::UpdateTab(tab_id, update))?;
        let window_id = st.require_tab(tab_id)?.window_id;

        if let Some(pinned) = update.pinned {
            let was_pinned = st.require_tab(tab_id)?.pinned;
            if pinned != was_pinned {
                // Pinned tabs live in a section at the left edge and never belong to a group.
                let pinned_before = st.pinned_count(window_id);
                if let Some(tab) = st.tabs.get_mut(&tab_id) {
                    tab.pinned = pinned;
                    if pinned {
                        tab.group_id = None;
                    }
                }
                let target = if pinned { pinned_before } else { pinned_before - 1 };
                st.reposition(window_id, &[tab_id], target);
                st.prune_empty_groups();
                st.events.push(HostEvent::TabUpdated {
                    tab_id,
                    change: TabChange {
                        pinned: Some(pinned),
                        ..TabChange::default()
                    },
                });
            }
        }

        if update.active == Some(true) {
            st.activate(window_id, tab_id);
        }

        st.require_tab(tab_id).cloned()
    }

    async fn move_tabs(&self, tab_ids: &[TabId], index: usize) -> Result<(), HostError> {
        let mut st = self.begin(HostCall::MoveTabs(tab_ids.to_vec(), index))?;
        let window_id = st.require_same_window(tab_ids)?;
        let from: Vec<(TabId, usize)> = tab_ids
            .iter()
            .filter_map(|id| st.tabs.get(id).map(|t| (t.id, t.index)))
            .collect();
        st.reposition(window_id, tab_ids, index);
        for (tab_id, from_index) in from {
            let to_index = st.tabs.get(&tab_id).map_or(from_index, |t| t.index);
            if to_index != from_index {
                st.events.push(HostEvent::TabMoved {
                    tab_id,
                    window_id,
                    from_index,
                    to_index,
                });
            }
        }
        Ok(())
    }

    async fn remove_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError> {
        let mut st = self.begin(HostCall::RemoveTabs(tab_ids.to_vec()))?;
        for id in tab_ids {
            st.require_tab(*id)?;
            if st.rejected_removals.contains(id) {
                return Err(HostError::Rejected(format!("Tab {} cannot be closed", id)));
            }
        }

        for id in tab_ids {
            let Some(tab) = st.tabs.remove(id) else {
                continue;
            };
            let window_id = tab.window_id;
            let order_idx = st
                .order
                .get(&window_id)
                .and_then(|o| o.iter().position(|x| x == id));
            if let Some(order) = st.order.get_mut(&window_id) {
                order.retain(|x| x != id);
            }
            st.reindex(window_id);

            let remaining = st.order.get(&window_id).map_or(0, Vec::len);
            st.events.push(HostEvent::TabRemoved {
                tab_id: *id,
                window_id,
                window_closing: remaining == 0,
            });

            if remaining == 0 {
                st.order.remove(&window_id);
                st.events.push(HostEvent::WindowRemoved { window_id });
            } else if tab.active {
                // Activate the nearest neighbor, preferring the one to the right.
                let next = order_idx.unwrap_or(0).min(remaining - 1);
                let next_id = st.order.get(&window_id).and_then(|o| o.get(next).copied());
                if let Some(next_id) = next_id {
                    st.activate(window_id, next_id);
                }
            }
        }

        st.prune_empty_groups();
        Ok(())
    }

    async fn reload_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut st = self.begin(HostCall::ReloadTab(tab_id))?;
        st.require_tab(tab_id)?;
        st.reloads.push(tab_id);
        st.events.push(HostEvent::TabUpdated {
            tab_id,
            change: TabChange {
                status: Some(LOADING.to_string()),
                ..TabChange::default()
            },
        });
        Ok(())
    }

    async fn duplicate_tab(&self, tab_id: TabId) -> Result<Tab, HostError> {
        let mut st = self.begin(HostCall::DuplicateTab(tab_id))?;
        let source = st.require_tab(tab_id)?.clone();

        let new_id = st.next_tab_id;
        st.next_tab_id += 1;
        let copy = Tab {
            id: new_id,
            active: false,
            pinned: false,
            group_id: if source.pinned { None } else { source.group_id },
            ..source.clone()
        };
        st.tabs.insert(new_id, copy);

        // The duplicate lands right after its source.
        if let Some(order) = st.order.get_mut(&source.window_id) {
            let at = order.iter().position(|x| *x == tab_id).map_or(order.len(), |i| i + 1);
            order.insert(at, new_id);
        }
        st.reindex(source.window_id);

        let created = st.require_tab(new_id)?.clone();
        st.events.push(HostEvent::TabCreated { tab: created.clone() });
        Ok(created)
    }

    async fn group_tabs(&self, tab_ids: &[TabId], group_id: Option<GroupId>) -> Result<GroupId, HostError> {
        let mut st = self.begin(HostCall::GroupTabs(tab_ids.to_vec(), group_id))?;
        let window_id = st.require_same_window(tab_ids)?;
        if tab_ids.iter().any(|id| st.tabs.get(id).is_some_and(|t| t.pinned)) {
            return Err(HostError::Rejected("Cannot group pinned tabs".to_string()));
        }

        let (target, insert_at) = match group_id {
            Some(gid) => {
                let group = st.groups.get(&gid).ok_or(HostError::GroupNotFound(gid))?;
                if group.window_id != window_id {
                    return Err(HostError::Rejected(
                        "Group belongs to another window".to_string(),
                    ));
                }
                // Joining tabs go right after the group's current last member.
                let members: Vec<Tab> = st
                    .window_tabs(window_id)
                    .into_iter()
                    .filter(|t| t.group_id == Some(gid) && !tab_ids.contains(&t.id))
                    .collect();
                let at = match members.last() {
                    Some(last) => {
                        let moving_before = tab_ids
                            .iter()
                            .filter(|id| st.tabs.get(*id).is_some_and(|t| t.index < last.index))
                            .count();
                        last.index + 1 - moving_before
                    }
                    None => tab_ids
                        .iter()
                        .filter_map(|id| st.tabs.get(id).map(|t| t.index))
                        .min()
                        .unwrap_or(0),
                };
                (gid, at)
            }
            None => {
                let gid = st.next_group_id;
                st.next_group_id += 1;
                let color = GroupColor::ALL[(gid.unsigned_abs() as usize) % GroupColor::ALL.len()];
                let group = TabGroup {
                    id: gid,
                    window_id,
                    title: String::new(),
                    color,
                    collapsed: false,
                };
                st.groups.insert(gid, group.clone());
                st.events.push(HostEvent::GroupCreated { group });
                let at = tab_ids
                    .iter()
                    .filter_map(|id| st.tabs.get(id).map(|t| t.index))
                    .min()
                    .unwrap_or(0);
                (gid, at)
            }
        };

        for id in tab_ids {
            if let Some(tab) = st.tabs.get_mut(id) {
                tab.group_id = Some(target);
            }
        }
        st.reposition(window_id, tab_ids, insert_at);
        st.prune_empty_groups();
        if let Some(group) = st.groups.get(&target).cloned() {
            st.events.push(HostEvent::GroupUpdated { group });
        }
        Ok(target)
    }

    async fn ungroup_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError> {
        let mut st = self.begin(HostCall::UngroupTabs(tab_ids.to_vec()))?;
        let mut leaving: Vec<Tab> = Vec::with_capacity(tab_ids.len());
        for id in tab_ids {
            let tab = st.require_tab(*id)?;
            if tab.group_id.is_some() {
                leaving.push(tab.clone());
            }
        }
        // Rightmost first, so tabs leaving one group keep their relative order.
        leaving.sort_by(|a, b| b.index.cmp(&a.index));

        let mut touched: Vec<GroupId> = Vec::new();
        for left in leaving {
            let Some(gid) = left.group_id else {
                continue;
            };
            if let Some(tab) = st.tabs.get_mut(&left.id) {
                tab.group_id = None;
            }
            if !touched.contains(&gid) {
                touched.push(gid);
            }

            // A tab with members on both sides moves out past the last of them.
            let members: Vec<usize> = st
                .window_tabs(left.window_id)
                .into_iter()
                .filter(|t| t.group_id == Some(gid))
                .map(|t| t.index)
                .collect();
            let inside = members.iter().any(|index| *index < left.index);
            let Some(last_index) = members.last().copied().filter(|last| inside && *last > left.index)
            else {
                continue;
            };
            st.reposition(left.window_id, &[left.id], last_index);
            let to_index = st.tabs.get(&left.id).map_or(left.index, |t| t.index);
            if to_index != left.index {
                st.events.push(HostEvent::TabMoved {
                    tab_id: left.id,
                    window_id: left.window_id,
                    from_index: left.index,
                    to_index,
                });
            }
        }

        st.prune_empty_groups();
        for gid in touched {
            if let Some(group) = st.groups.get(&gid).cloned() {
                st.events.push(HostEvent::GroupUpdated { group });
            }
        }
        Ok(())
    }

    async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> Result<TabGroup, HostError> {
        let mut st = self.begin(HostCall::UpdateGroup(group_id, update.clone()))?;
        let group = st
            .groups
            .get_mut(&group_id)
            .ok_or(HostError::GroupNotFound(group_id))?;
        if let Some(title) = update.title {
            group.title = title;
        }
        if let Some(color) = update.color {
            group.color = color;
        }
        if let Some(collapsed) = update.collapsed {
            group.collapsed = collapsed;
        }
        let updated = group.clone();
        st.events.push(HostEvent::GroupUpdated {
            group: updated.clone(),
        });
        Ok(updated)
    }
}
