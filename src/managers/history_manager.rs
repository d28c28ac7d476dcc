//! History Tracker for the tab sidebar.
//!
//! Keeps, per window, a most-recently-used ordering of tab ids: the active tab
//! first, then the tab that was active before it, and so on. Entries are
//! unique and the list is capped.

use std::collections::HashMap;

use log::{debug, info};

use crate::host::TabHost;
use crate::types::errors::{HistoryError, HostError};
use crate::types::settings::DEFAULT_HISTORY_CAP;
use crate::types::tab::{TabId, WindowId};

/// Smallest usable cap: index 1 must be reachable.
const MIN_HISTORY_CAP: usize = 2;

/// Trait defining the synchronous history bookkeeping operations.
pub trait HistoryTrackerTrait {
    fn record_activation(&mut self, window_id: WindowId, tab_id: TabId);
    fn record_closure(&mut self, window_id: WindowId, tab_id: TabId);
    fn discard_window(&mut self, window_id: WindowId);
    fn history(&self, window_id: WindowId) -> &[TabId];
    fn window_count(&self) -> usize;
}

/// Per-window MRU history owned by the coordinator.
pub struct HistoryTracker {
    windows: HashMap<WindowId, Vec<TabId>>,
    max_entries: usize,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAP)
    }

    /// Creates a tracker keeping at most `max_entries` tabs per window (never fewer than 2).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            windows: HashMap::new(),
            max_entries: max_entries.max(MIN_HISTORY_CAP),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Changes the cap, trimming the oldest entries of every window that exceeds it.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries.max(MIN_HISTORY_CAP);
        for history in self.windows.values_mut() {
            history.truncate(self.max_entries);
        }
    }

    /// Returns the previously active tab of `window_id`.
    ///
    /// Index 0 is the current tab, so the candidate is index 1. Candidates the
    /// host no longer knows are dropped from history and the next one is tried;
    /// the loop runs at most once per entry.
    pub async fn previous_tab<H: TabHost>(
        &mut self,
        window_id: WindowId,
        host: &H,
    ) -> Result<TabId, HistoryError> {
        let attempts = self.history(window_id).len();
        for _ in 0..attempts {
            let candidate = match self.history(window_id).get(1) {
                Some(id) => *id,
                None => break,
            };
            match host.get_tab(candidate).await {
                Ok(_) => return Ok(candidate),
                Err(HostError::TabNotFound(_)) => {
                    debug!("Dropping stale history entry {} in window {}", candidate, window_id);
                    if let Some(history) = self.windows.get_mut(&window_id) {
                        history.remove(1);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(HistoryError::NoPreviousTab)
    }
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTrackerTrait for HistoryTracker {
    /// Moves `tab_id` to the front of the window's history, evicting the oldest entry past the cap.
    fn record_activation(&mut self, window_id: WindowId, tab_id: TabId) {
        let history = self.windows.entry(window_id).or_default();
        if let Some(pos) = history.iter().position(|id| *id == tab_id) {
            history.remove(pos);
        }
        history.insert(0, tab_id);
        history.truncate(self.max_entries);
    }

    fn record_closure(&mut self, window_id: WindowId, tab_id: TabId) {
        if let Some(history) = self.windows.get_mut(&window_id) {
            history.retain(|id| *id != tab_id);
        }
    }

    fn discard_window(&mut self, window_id: WindowId) {
        if self.windows.remove(&window_id).is_some() {
            info!("Discarded tab history for window {}", window_id);
        }
    }

    fn history(&self, window_id: WindowId) -> &[TabId] {
        self.windows.get(&window_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn window_count(&self) -> usize {
        self.windows.len()
    }
}
