use std::time::{Duration, Instant};

use tabsidebar::managers::drag_manager::{DropIndicator, DropTarget, Placement};
use tabsidebar::managers::panel_state::{ActionPlan, GroupAction, PanelState, TabAction};
use tabsidebar::managers::selection_manager::ClickModifiers;
use tabsidebar::services::localization_engine::LocalizationEngine;
use tabsidebar::services::snapshot_builder::{assemble, Placeholders};
use tabsidebar::types::command::Command;
use tabsidebar::types::errors::DragError;
use tabsidebar::types::event::HostEvent;
use tabsidebar::types::group::{GroupColor, GroupTarget, TabGroup};
use tabsidebar::types::settings::PanelSettings;
use tabsidebar::types::snapshot::TabSnapshot;
use tabsidebar::types::tab::{GroupId, Tab, TabChange, TabId};

const WINDOW: i32 = 1;

fn tab(id: TabId, index: usize, url: &str, group_id: Option<GroupId>, pinned: bool) -> Tab {
    Tab {
        id,
        window_id: WINDOW,
        title: format!("Tab {}", id),
        url: url.to_string(),
        fav_icon_url: None,
        active: id == 1,
        pinned,
        group_id,
        index,
    }
}

fn group(id: GroupId, title: &str, collapsed: bool) -> TabGroup {
    TabGroup {
        id,
        window_id: WINDOW,
        title: title.to_string(),
        color: GroupColor::Orange,
        collapsed,
    }
}

/// 1 pinned, 2-3 in "Work", 4 in collapsed "Fun", 5-6 ungrouped.
fn fixture() -> TabSnapshot {
    assemble(
        vec![
            tab(1, 0, "https://pinned.test/", None, true),
            tab(2, 1, "https://work.test/a", Some(10), false),
            tab(3, 2, "https://work.test/b", Some(10), false),
            tab(4, 3, "https://fun.test/", Some(20), false),
            tab(5, 4, "https://news.test/", None, false),
            tab(6, 5, "", None, false),
        ],
        vec![group(10, "Work", false), group(20, "Fun", true)],
        &Placeholders::default(),
    )
}

fn panel() -> PanelState {
    let mut panel = PanelState::new(WINDOW, Duration::from_millis(150));
    panel.apply_snapshot(fixture());
    panel
}

fn l10n() -> LocalizationEngine {
    LocalizationEngine::for_locale("en").unwrap()
}

#[test]
fn test_new_panel_is_empty() {
    let panel = PanelState::new(3, Duration::from_millis(150));
    assert_eq!(panel.window_id(), 3);
    assert!(panel.view().is_empty);
    assert_eq!(panel.refresh_command(), Command::GetTabs { window_id: 3 });
}

#[test]
fn test_apply_snapshot_renders_view() {
    let panel = panel();
    assert_eq!(panel.snapshot().total_count, 6);
    assert_eq!(panel.view().visible_tab_ids(), vec![2, 3, 4, 1, 5, 6]);
    assert!(panel.view().show_ungrouped_header);
}

#[test]
fn test_apply_snapshot_prunes_closed_selection() {
    let mut panel = panel();
    panel.click(2, ClickModifiers::multi());
    panel.click(5, ClickModifiers::multi());

    let smaller = assemble(
        vec![tab(2, 0, "https://work.test/a", None, false)],
        Vec::new(),
        &Placeholders::default(),
    );
    panel.apply_snapshot(smaller);
    assert_eq!(panel.selection().selected(), &[2]);
}

#[test]
fn test_host_events_that_refresh() {
    let panel = panel();
    assert!(panel.on_host_event(&HostEvent::TabActivated { tab_id: 2, window_id: WINDOW }));
    assert!(panel.on_host_event(&HostEvent::TabUpdated {
        tab_id: 2,
        change: TabChange { pinned: Some(true), ..TabChange::default() },
    }));
    assert!(!panel.on_host_event(&HostEvent::TabUpdated {
        tab_id: 2,
        change: TabChange {
            status: Some("loading".to_string()),
            ..TabChange::default()
        },
    }));
}

#[test]
fn test_search_applies_after_debounce() {
    let mut panel = panel();
    let start = Instant::now();

    panel.set_query("fun", start);
    assert_eq!(panel.search_deadline(), Some(start + Duration::from_millis(150)));
    assert!(!panel.poll_search(start + Duration::from_millis(100)));
    assert_eq!(panel.query(), "");
    assert_eq!(panel.view().groups.len(), 2);

    assert!(panel.poll_search(start + Duration::from_millis(150)));
    assert_eq!(panel.query(), "fun");
    assert!(panel.view().searching);
    assert_eq!(panel.view().visible_tab_ids(), vec![4]);
    // Collapsed groups open while searching
    assert!(!panel.view().groups[0].collapsed);
}

#[test]
fn test_search_debounce_comes_from_settings() {
    let mut settings = PanelSettings::default();
    settings.search.debounce_ms = 400;
    let mut panel = PanelState::from_settings(WINDOW, &settings);
    panel.apply_snapshot(fixture());
    assert_eq!(panel.search_debounce(), Duration::from_millis(400));

    let start = Instant::now();
    panel.set_query("fun", start);
    assert_eq!(panel.search_deadline(), Some(start + Duration::from_millis(400)));
    assert!(!panel.poll_search(start + Duration::from_millis(150)));
    assert!(panel.poll_search(start + Duration::from_millis(400)));
    assert_eq!(panel.query(), "fun");
}

#[test]
fn test_range_click_follows_rendered_order() {
    let mut panel = panel();
    assert_eq!(panel.click(3, ClickModifiers::plain()), Some(Command::SwitchTab { tab_id: 3 }));
    assert_eq!(panel.click(5, ClickModifiers::range()), None);

    let mut selected = panel.selection().selected().to_vec();
    selected.sort_unstable();
    assert_eq!(selected, vec![1, 3, 4, 5]);
}

#[test]
fn test_labels() {
    let mut panel = panel();
    let l10n = l10n();
    assert_eq!(panel.selection_label(&l10n), None);
    assert_eq!(panel.tab_count_label(&l10n), "6 tabs");

    panel.click(2, ClickModifiers::multi());
    assert_eq!(panel.selection_label(&l10n).as_deref(), Some("1 tab selected"));
    panel.click(3, ClickModifiers::multi());
    assert_eq!(panel.selection_label(&l10n).as_deref(), Some("2 tabs selected"));
}

#[test]
fn test_tab_menu_single_target() {
    let panel = panel();
    let menu = panel.tab_menu(2, &l10n()).unwrap();

    assert_eq!(menu.targets, vec![2]);
    assert_eq!(menu.targets_label, None);
    assert_eq!(menu.pin_label.as_deref(), Some("Pin tab"));
    assert!(menu.can_remove_from_group);
    let others: Vec<GroupId> = menu.other_groups.iter().map(|g| g.id).collect();
    assert_eq!(others, vec![20]);

    let pinned_menu = panel.tab_menu(1, &l10n()).unwrap();
    assert_eq!(pinned_menu.pin_label.as_deref(), Some("Unpin tab"));
    assert!(!pinned_menu.can_remove_from_group);
    assert_eq!(pinned_menu.other_groups.len(), 2);

    assert!(panel.tab_menu(99, &l10n()).is_none());
}

#[test]
fn test_tab_menu_for_selection() {
    let mut panel = panel();
    panel.click(5, ClickModifiers::multi());
    panel.click(6, ClickModifiers::multi());

    let menu = panel.tab_menu(6, &l10n()).unwrap();
    assert_eq!(menu.targets, vec![5, 6]);
    assert_eq!(menu.targets_label.as_deref(), Some("2 tabs"));
    assert_eq!(menu.pin_label, None);

    // Right-click outside the selection acts on that tab only
    assert_eq!(panel.tab_menu(2, &l10n()).unwrap().targets, vec![2]);
}

#[test]
fn test_group_menu_labels() {
    let panel = panel();
    let work = panel.group_menu(10, &l10n()).unwrap();
    assert!(!work.collapsed);
    assert_eq!(work.collapse_label, "Collapse group");
    assert_eq!(panel.group_menu(20, &l10n()).unwrap().collapse_label, "Expand group");
    assert!(panel.group_menu(99, &l10n()).is_none());
}

#[test]
fn test_tab_actions_on_selection_clear_it() {
    let mut panel = panel();
    panel.click(2, ClickModifiers::multi());
    panel.click(5, ClickModifiers::multi());

    let plan = panel.tab_action(5, TabAction::Close, &l10n(), GroupColor::Blue);
    assert_eq!(
        plan.commands,
        vec![Command::CloseTab { tab_id: 2 }, Command::CloseTab { tab_id: 5 }]
    );
    assert!(panel.selection().is_empty());
}

#[test]
fn test_reload_and_remove_from_group() {
    let mut panel = panel();
    let plan = panel.tab_action(3, TabAction::Reload, &l10n(), GroupColor::Blue);
    assert_eq!(plan.commands, vec![Command::ReloadTab { tab_id: 3 }]);

    let plan = panel.tab_action(3, TabAction::RemoveFromGroup, &l10n(), GroupColor::Blue);
    assert_eq!(plan.commands, vec![Command::RemoveTabFromGroup { tab_id: 3 }]);
}

#[test]
fn test_pin_acts_on_origin_only() {
    let mut panel = panel();
    panel.click(2, ClickModifiers::multi());
    panel.click(3, ClickModifiers::multi());

    let plan = panel.tab_action(3, TabAction::TogglePin, &l10n(), GroupColor::Blue);
    assert_eq!(plan.commands, vec![Command::TogglePin { tab_id: 3 }]);
}

#[test]
fn test_copy_links_skips_empty_urls() {
    let mut panel = panel();
    panel.click(5, ClickModifiers::multi());
    panel.click(6, ClickModifiers::multi());
    panel.click(2, ClickModifiers::multi());

    let plan = panel.tab_action(2, TabAction::CopyLinks, &l10n(), GroupColor::Blue);
    assert!(plan.commands.is_empty());
    assert_eq!(
        plan.clipboard.as_deref(),
        Some("https://news.test/\nhttps://work.test/a")
    );

    let plan = panel.tab_action(6, TabAction::CopyLinks, &l10n(), GroupColor::Blue);
    assert_eq!(plan, ActionPlan::default());
}

#[test]
fn test_create_and_add_to_group() {
    let mut panel = panel();
    panel.click(5, ClickModifiers::multi());
    panel.click(6, ClickModifiers::multi());

    let plan = panel.tab_action(5, TabAction::CreateGroup, &l10n(), GroupColor::Pink);
    assert_eq!(
        plan.commands,
        vec![Command::CreateGroupWithTabs {
            tab_ids: vec![5, 6],
            title: Some("New group".to_string()),
            color: Some(GroupColor::Pink),
        }]
    );

    let plan = panel.tab_action(4, TabAction::AddToGroup(10), &l10n(), GroupColor::Pink);
    assert_eq!(
        plan.commands,
        vec![Command::AddTabsToGroup {
            tab_ids: vec![4],
            group_id: 10,
        }]
    );
}

#[test]
fn test_group_actions() {
    let panel = panel();
    assert_eq!(
        panel.group_action(10, GroupAction::Rename("  Deep work ".to_string())),
        Some(Command::RenameGroup {
            group_id: 10,
            title: "Deep work".to_string()
        })
    );
    assert_eq!(panel.group_action(10, GroupAction::Rename("   ".to_string())), None);
    assert_eq!(
        panel.group_action(20, GroupAction::ToggleCollapsed),
        Some(Command::ToggleGroupCollapsed {
            group_id: 20,
            collapsed: false
        })
    );
    assert_eq!(panel.group_action(99, GroupAction::ToggleCollapsed), None);
    assert_eq!(
        panel.group_action(10, GroupAction::Ungroup),
        Some(Command::Ungroup { group_id: 10 })
    );
    assert_eq!(
        panel.group_action(10, GroupAction::CloseTabs),
        Some(Command::CloseGroupTabs { group_id: 10 })
    );
    assert_eq!(
        panel.group_action(10, GroupAction::ChangeColor(GroupColor::Yellow)),
        Some(Command::ChangeGroupColor {
            group_id: 10,
            color: GroupColor::Yellow
        })
    );
}

#[test]
fn test_toggle_all_groups() {
    let mut panel = panel();
    // One group expanded: collapse everything
    assert_eq!(
        panel.toggle_all_groups(),
        vec![
            Command::ToggleGroupCollapsed { group_id: 10, collapsed: true },
            Command::ToggleGroupCollapsed { group_id: 20, collapsed: true },
        ]
    );

    let all_collapsed = assemble(
        vec![tab(2, 0, "", Some(10), false), tab(4, 1, "", Some(20), false)],
        vec![group(10, "Work", true), group(20, "Fun", true)],
        &Placeholders::default(),
    );
    panel.apply_snapshot(all_collapsed);
    assert!(panel
        .toggle_all_groups()
        .iter()
        .all(|c| matches!(c, Command::ToggleGroupCollapsed { collapsed: false, .. })));
}

#[test]
fn test_close_button() {
    assert_eq!(panel().close_button(5), Command::CloseTab { tab_id: 5 });
}

#[test]
fn test_drag_through_panel() {
    let mut panel = panel();
    assert_eq!(panel.start_tab_drag(1), Err(DragError::PinnedTab(1)));

    panel.start_tab_drag(5).unwrap();
    assert!(panel.drag().is_dragging());
    assert_eq!(panel.drag_over(DropTarget::GroupHeader(10)), Some(DropIndicator::Header(10)));
    assert_eq!(
        panel.drop_on(DropTarget::GroupHeader(10)),
        Some(Command::MoveTab {
            tab_id: 5,
            target_index: None,
            target_group_id: Some(GroupTarget::Group(10)),
        })
    );

    panel.start_group_drag(20).unwrap();
    assert_eq!(
        panel.drop_on(DropTarget::Group {
            group_id: 10,
            placement: Placement::Before
        }),
        Some(Command::MoveGroup {
            group_id: 20,
            target_index: 1
        })
    );

    panel.start_group_drag(20).unwrap();
    panel.end_drag();
    assert!(!panel.drag().is_dragging());
}
