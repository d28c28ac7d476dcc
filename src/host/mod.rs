//! Host tab/group API consumed by the coordinator.
//!
//! The browser owns tabs and groups; this crate only observes and asks for
//! changes through `TabHost`. `MemoryHost` implements the trait over plain
//! in-memory state for tests and the RPC binary.

pub mod memory;

use crate::types::errors::HostError;
use crate::types::group::{GroupUpdate, TabGroup};
use crate::types::tab::{GroupId, Tab, TabId, TabQuery, TabUpdate, WindowId};

pub use memory::{HostCall, HostFixture, HostOp, MemoryHost};

/// Asynchronous request/response access to the host's tabs and groups.
///
/// Every call is independent; the host is the unit of atomicity.
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// Tabs matching `query`, ordered by position.
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<Tab>, HostError>;
    async fn query_groups(&self, window_id: WindowId) -> Result<Vec<TabGroup>, HostError>;
    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError>;
    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> Result<Tab, HostError>;
    /// Moves `tab_ids`, in the given order, so the first lands at `index`.
    /// `index` counts positions among the tabs that are not being moved.
    async fn move_tabs(&self, tab_ids: &[TabId], index: usize) -> Result<(), HostError>;
    async fn remove_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError>;
    async fn reload_tab(&self, tab_id: TabId) -> Result<(), HostError>;
    async fn duplicate_tab(&self, tab_id: TabId) -> Result<Tab, HostError>;
    /// Adds `tab_ids` to `group_id`, or to a newly created group when `None`.
    async fn group_tabs(&self, tab_ids: &[TabId], group_id: Option<GroupId>) -> Result<GroupId, HostError>;
    async fn ungroup_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError>;
    async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> Result<TabGroup, HostError>;
}
