//! Unit tests for the HistoryTracker public API.
//!
//! Synchronous bookkeeping goes through `HistoryTrackerTrait`; `previous_tab`
//! is exercised against a `MemoryHost` so stale entries can be simulated by
//! dropping tabs the tracker was never told about.

use tabsidebar::host::{HostFixture, HostOp, MemoryHost};
use tabsidebar::managers::history_manager::{HistoryTracker, HistoryTrackerTrait};
use tabsidebar::types::errors::{HistoryError, HostError};
use tabsidebar::types::tab::{Tab, TabId};

const WINDOW: i32 = 1;

fn tab(id: TabId, index: usize) -> Tab {
    Tab {
        id,
        window_id: WINDOW,
        title: format!("Tab {}", id),
        url: format!("https://example.com/{}", id),
        fav_icon_url: None,
        active: false,
        pinned: false,
        group_id: None,
        index,
    }
}

fn host_with(ids: &[TabId]) -> MemoryHost {
    let tabs = ids.iter().enumerate().map(|(i, id)| tab(*id, i)).collect();
    MemoryHost::from_fixture(HostFixture {
        tabs,
        groups: Vec::new(),
    })
}

/// Activates `ids` in order, so the last one ends up at the front.
fn tracker_after(ids: &[TabId]) -> HistoryTracker {
    let mut tracker = HistoryTracker::new();
    for id in ids {
        tracker.record_activation(WINDOW, *id);
    }
    tracker
}

#[test]
fn test_activation_moves_tab_to_front() {
    let tracker = tracker_after(&[1, 2, 3, 1]);
    assert_eq!(tracker.history(WINDOW), &[1, 3, 2]);
}

#[test]
fn test_activation_never_duplicates() {
    let tracker = tracker_after(&[4, 4, 4]);
    assert_eq!(tracker.history(WINDOW), &[4]);
}

#[test]
fn test_history_is_capped_at_fifty_by_default() {
    let ids: Vec<TabId> = (1..=60).collect();
    let tracker = tracker_after(&ids);
    let history = tracker.history(WINDOW);
    assert_eq!(history.len(), 50);
    assert_eq!(history[0], 60);
    assert_eq!(history[49], 11);
}

#[test]
fn test_closure_removes_entry() {
    let mut tracker = tracker_after(&[1, 2, 3]);
    tracker.record_closure(WINDOW, 2);
    assert_eq!(tracker.history(WINDOW), &[3, 1]);

    // Unknown tabs and windows are ignored
    tracker.record_closure(WINDOW, 99);
    tracker.record_closure(7, 1);
    assert_eq!(tracker.history(WINDOW), &[3, 1]);
}

#[test]
fn test_discard_window_drops_history() {
    let mut tracker = tracker_after(&[1, 2]);
    tracker.record_activation(2, 10);
    assert_eq!(tracker.window_count(), 2);

    tracker.discard_window(WINDOW);
    assert!(tracker.history(WINDOW).is_empty());
    assert_eq!(tracker.window_count(), 1);
}

#[test]
fn test_windows_are_independent() {
    let mut tracker = HistoryTracker::new();
    tracker.record_activation(1, 10);
    tracker.record_activation(2, 20);
    tracker.record_activation(1, 11);
    assert_eq!(tracker.history(1), &[11, 10]);
    assert_eq!(tracker.history(2), &[20]);
}

#[test]
fn test_custom_capacity_has_floor_of_two() {
    let tracker = HistoryTracker::with_capacity(0);
    assert_eq!(tracker.max_entries(), 2);
}

#[test]
fn test_lowering_capacity_trims_existing_history() {
    let mut tracker = tracker_after(&[1, 2, 3, 4, 5]);
    tracker.set_max_entries(3);
    assert_eq!(tracker.history(WINDOW), &[5, 4, 3]);
}

#[tokio::test]
async fn test_previous_tab_returns_second_entry() {
    let host = host_with(&[1, 2, 3]);
    let mut tracker = tracker_after(&[1, 2, 3]);
    assert_eq!(tracker.previous_tab(WINDOW, &host).await, Ok(2));
    // A successful lookup leaves history untouched
    assert_eq!(tracker.history(WINDOW), &[3, 2, 1]);
}

#[tokio::test]
async fn test_previous_tab_skips_stale_entries() {
    let host = host_with(&[5, 3, 1]);
    let mut tracker = tracker_after(&[1, 3, 5]);
    assert_eq!(tracker.history(WINDOW), &[5, 3, 1]);

    // Tab 3 closes without the tracker hearing about it
    host.forget_tab(3);

    assert_eq!(tracker.previous_tab(WINDOW, &host).await, Ok(1));
    assert_eq!(tracker.history(WINDOW), &[5, 1]);
}

#[tokio::test]
async fn test_previous_tab_with_single_entry() {
    let host = host_with(&[1]);
    let mut tracker = tracker_after(&[1]);
    assert_eq!(
        tracker.previous_tab(WINDOW, &host).await,
        Err(HistoryError::NoPreviousTab)
    );
}

#[tokio::test]
async fn test_previous_tab_for_unknown_window() {
    let host = host_with(&[1]);
    let mut tracker = HistoryTracker::new();
    assert_eq!(
        tracker.previous_tab(42, &host).await,
        Err(HistoryError::NoPreviousTab)
    );
}

#[tokio::test]
async fn test_previous_tab_when_every_candidate_is_stale() {
    let host = host_with(&[1, 2, 3]);
    let mut tracker = tracker_after(&[1, 2, 3]);
    host.forget_tab(1);
    host.forget_tab(2);

    assert_eq!(
        tracker.previous_tab(WINDOW, &host).await,
        Err(HistoryError::NoPreviousTab)
    );
    assert_eq!(tracker.history(WINDOW), &[3]);
}

#[tokio::test]
async fn test_previous_tab_propagates_other_host_errors() {
    let host = host_with(&[1, 2]);
    let mut tracker = tracker_after(&[1, 2]);
    host.reject(HostOp::GetTab, "host unavailable");

    assert_eq!(
        tracker.previous_tab(WINDOW, &host).await,
        Err(HistoryError::Host(HostError::Rejected("host unavailable".to_string())))
    );
    // The candidate was not treated as stale
    assert_eq!(tracker.history(WINDOW), &[2, 1]);
}
