use std::time::{Duration, Instant};

use rstest::rstest;
use tabsidebar::services::search_filter::{
    build_view, display_domain, filter_tabs, matches, normalize_query, SearchDebouncer,
};
use tabsidebar::services::snapshot_builder::{assemble, Placeholders};
use tabsidebar::types::group::{GroupColor, TabGroup};
use tabsidebar::types::snapshot::TabSnapshot;
use tabsidebar::types::tab::{GroupId, Tab, TabId};

fn tab(id: TabId, index: usize, title: &str, url: &str, group_id: Option<GroupId>) -> Tab {
    Tab {
        id,
        window_id: 1,
        title: title.to_string(),
        url: url.to_string(),
        fav_icon_url: None,
        active: false,
        pinned: false,
        group_id,
        index,
    }
}

fn group(id: GroupId, title: &str, collapsed: bool) -> TabGroup {
    TabGroup {
        id,
        window_id: 1,
        title: title.to_string(),
        color: GroupColor::Purple,
        collapsed,
    }
}

fn fixture() -> TabSnapshot {
    let tabs = vec![
        tab(1, 0, "Rust Book", "https://doc.rust-lang.org/book/", Some(10)),
        tab(2, 1, "Cargo Guide", "https://doc.rust-lang.org/cargo/", Some(10)),
        tab(3, 2, "Weather", "https://weather.example.com/", Some(20)),
        tab(4, 3, "Inbox", "https://mail.example.com/", None),
        tab(5, 4, "Crates", "https://crates.io/", None),
    ];
    assemble(
        tabs,
        vec![group(10, "Docs", true), group(20, "Misc", false)],
        &Placeholders::default(),
    )
}

#[test]
fn test_normalize_query() {
    assert_eq!(normalize_query("  RuSt  "), "rust");
    assert_eq!(normalize_query("   "), "");
}

#[rstest]
#[case("", true)]
#[case("rust", true)]
#[case("book", true)]
#[case("lang.org", true)]
#[case("python", false)]
fn test_matches_title_or_url(#[case] query: &str, #[case] expected: bool) {
    let t = tab(1, 0, "Rust Book", "https://doc.rust-lang.org/", None);
    assert_eq!(matches(&t, query), expected);
}

#[test]
fn test_filter_preserves_order() {
    let snapshot = fixture();
    let hits: Vec<TabId> = filter_tabs(&snapshot.ungrouped_tabs, "example")
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(hits, vec![4]);
}

#[rstest]
#[case("https://www.example.com/path?q=1", "www.example.com")]
#[case("http://localhost:8080/", "localhost")]
#[case("about:blank", "about:blank")]
#[case("not a url", "not a url")]
#[case("", "")]
fn test_display_domain(#[case] url: &str, #[case] expected: &str) {
    assert_eq!(display_domain(url), expected);
}

#[test]
fn test_view_without_query_keeps_everything() {
    let view = build_view(&fixture(), "");

    assert!(!view.searching);
    assert!(!view.is_empty);
    assert_eq!(view.groups.len(), 2);
    assert!(view.groups[0].collapsed);
    assert_eq!(view.groups[0].tab_count, 2);
    assert!(view.show_ungrouped_header);
    assert_eq!(view.visible_tab_ids(), vec![1, 2, 3, 4, 5]);
    assert_eq!(view.row(3).map(|r| r.domain.as_str()), Some("weather.example.com"));
}

#[test]
fn test_search_hides_groups_without_matches() {
    let view = build_view(&fixture(), "CARGO");

    assert!(view.searching);
    assert_eq!(view.groups.len(), 1);
    let docs = &view.groups[0];
    assert_eq!(docs.id, 10);
    // Collapsed state is ignored while searching
    assert!(!docs.collapsed);
    // Header count reflects the whole group
    assert_eq!(docs.tab_count, 2);
    assert_eq!(docs.tabs.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    assert!(view.ungrouped.is_empty());
    assert!(!view.show_ungrouped_header);
}

#[test]
fn test_search_without_matches_is_empty() {
    let view = build_view(&fixture(), "zzz");
    assert!(view.is_empty);
    assert!(view.groups.is_empty());
    assert!(view.visible_tab_ids().is_empty());
}

#[test]
fn test_ungrouped_header_needs_groups() {
    let snapshot = assemble(
        vec![tab(1, 0, "a", "https://a.test/", None)],
        Vec::new(),
        &Placeholders::default(),
    );
    let view = build_view(&snapshot, "");
    assert_eq!(view.ungrouped.len(), 1);
    assert!(!view.show_ungrouped_header);
}

#[test]
fn test_memberless_group_shown_only_without_query() {
    let snapshot = assemble(Vec::new(), vec![group(7, "Empty", false)], &Placeholders::default());
    assert_eq!(build_view(&snapshot, "").groups.len(), 1);
    assert!(build_view(&snapshot, "x").is_empty);
}

#[test]
fn test_view_serializes_camel_case() {
    let view = build_view(&fixture(), "");
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["showUngroupedHeader"], true);
    assert_eq!(json["groups"][0]["tabCount"], 2);
    assert_eq!(json["ungrouped"][0]["favIconUrl"], serde_json::Value::Null);
}

#[test]
fn test_debouncer_fires_once_after_quiet_period() {
    let start = Instant::now();
    let mut debouncer = SearchDebouncer::from_millis(150);
    assert_eq!(debouncer.wait(), Duration::from_millis(150));
    assert!(!debouncer.poll(start));

    debouncer.input(start);
    debouncer.input(start + Duration::from_millis(100));
    assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(250)));

    assert!(!debouncer.poll(start + Duration::from_millis(200)));
    assert!(debouncer.is_pending());
    assert!(debouncer.poll(start + Duration::from_millis(250)));
    assert!(!debouncer.poll(start + Duration::from_millis(400)));
}

#[test]
fn test_debouncer_cancel() {
    let start = Instant::now();
    let mut debouncer = SearchDebouncer::from_millis(50);
    debouncer.input(start);
    debouncer.cancel();
    assert!(!debouncer.is_pending());
    assert!(!debouncer.poll(start + Duration::from_secs(1)));
}
