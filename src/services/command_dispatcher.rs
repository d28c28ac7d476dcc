//! Command Dispatcher: turns panel requests into host calls.
//!
//! `dispatch` matches the closed `Command` type exhaustively and hands each
//! variant to a function below. A handler issues a short fixed sequence of
//! host calls and reports the first failure; earlier steps are never rolled
//! back.

use futures::future::join_all;
use log::{debug, warn};

use crate::host::TabHost;
use crate::managers::history_manager::HistoryTracker;
use crate::services::color_picker::ColorPicker;
use crate::services::snapshot_builder::{build_snapshot, Placeholders};
use crate::types::command::{Command, CommandOutcome};
use crate::types::errors::{CommandError, HostError};
use crate::types::group::{GroupColor, GroupTarget, GroupUpdate};
use crate::types::tab::{GroupId, Tab, TabId, TabQuery, TabUpdate, WindowId};

/// Coordinator state a command may read or update.
pub struct DispatchContext<'a> {
    pub history: &'a mut HistoryTracker,
    pub placeholders: &'a Placeholders,
    /// Title given to groups created without one.
    pub new_group_title: &'a str,
    pub colors: &'a dyn ColorPicker,
}

/// Runs `command` against `host`.
pub async fn dispatch<H: TabHost>(
    host: &H,
    ctx: DispatchContext<'_>,
    command: Command,
) -> Result<CommandOutcome, CommandError> {
    let name = command.name();
    debug!("Dispatching {}", name);

    let result = match command {
        Command::GetTabs { window_id } => build_snapshot(host, window_id, ctx.placeholders)
            .await
            .map(CommandOutcome::Snapshot)
            .map_err(CommandError::from),
        Command::SwitchTab { tab_id } => switch_tab(host, tab_id).await.map(done),
        Command::SwitchToPreviousTab { window_id } => {
            switch_to_previous_tab(host, ctx.history, window_id)
                .await
                .map(CommandOutcome::Switched)
        }
        Command::CloseTab { tab_id } => close_tab(host, tab_id).await.map(done),
        Command::CloseOtherTabs { tab_id, window_id } => {
            close_other_tabs(host, tab_id, window_id).await.map(done)
        }
        Command::CloseTabsToRight { tab_id, window_id } => {
            close_tabs_to_right(host, tab_id, window_id).await.map(done)
        }
        Command::TogglePin { tab_id } => toggle_pin(host, tab_id).await.map(done),
        Command::ReloadTab { tab_id } => host.reload_tab(tab_id).await.map_err(CommandError::from).map(done),
        Command::DuplicateTab { tab_id } => host
            .duplicate_tab(tab_id)
            .await
            .map_err(CommandError::from)
            .map(done),
        Command::ToggleGroupCollapsed { group_id, collapsed } => {
            let update = GroupUpdate {
                collapsed: Some(collapsed),
                ..GroupUpdate::default()
            };
            update_group(host, group_id, update).await.map(done)
        }
        Command::AddTabToGroup { tab_id, group_id } => {
            add_tabs_to_group(host, &[tab_id], group_id).await.map(done)
        }
        Command::AddTabsToGroup { tab_ids, group_id } => {
            add_tabs_to_group(host, &tab_ids, group_id).await.map(done)
        }
        Command::CreateGroupWithTab { tab_id, title, color } => {
            create_group(host, &ctx, &[tab_id], title, color)
                .await
                .map(CommandOutcome::GroupCreated)
        }
        Command::CreateGroupWithTabs { tab_ids, title, color } => {
            create_group(host, &ctx, &tab_ids, title, color)
                .await
                .map(CommandOutcome::GroupCreated)
        }
        Command::RemoveTabFromGroup { tab_id } => host
            .ungroup_tabs(&[tab_id])
            .await
            .map_err(CommandError::from)
            .map(done),
        Command::MoveTab {
            tab_id,
            target_index,
            target_group_id,
        } => move_tab(host, tab_id, target_index, target_group_id).await.map(done),
        Command::RenameGroup { group_id, title } => {
            let update = GroupUpdate {
                title: Some(title),
                ..GroupUpdate::default()
            };
            update_group(host, group_id, update).await.map(done)
        }
        Command::ChangeGroupColor { group_id, color } => {
            let update = GroupUpdate {
                color: Some(color),
                ..GroupUpdate::default()
            };
            update_group(host, group_id, update).await.map(done)
        }
        Command::CloseGroupTabs { group_id } => close_group_tabs(host, group_id).await.map(done),
        Command::Ungroup { group_id } => ungroup(host, group_id).await.map(done),
        Command::MoveGroup {
            group_id,
            target_index,
        } => move_group(host, group_id, target_index).await.map(done),
    };

    if let Err(e) = &result {
        warn!("{} failed: {}", name, e);
    }
    result
}

fn done<T>(_: T) -> CommandOutcome {
    CommandOutcome::Done
}

pub async fn switch_tab<H: TabHost>(host: &H, tab_id: TabId) -> Result<Tab, CommandError> {
    Ok(host.update_tab(tab_id, TabUpdate::activate()).await?)
}

/// Activates the window's previously active tab, skipping stale history entries.
pub async fn switch_to_previous_tab<H: TabHost>(
    host: &H,
    history: &mut HistoryTracker,
    window_id: WindowId,
) -> Result<TabId, CommandError> {
    let tab_id = history.previous_tab(window_id, host).await?;
    switch_tab(host, tab_id).await?;
    Ok(tab_id)
}

pub async fn close_tab<H: TabHost>(host: &H, tab_id: TabId) -> Result<(), CommandError> {
    Ok(host.remove_tabs(&[tab_id]).await?)
}

/// Closes every unpinned tab of the window except `tab_id`.
pub async fn close_other_tabs<H: TabHost>(
    host: &H,
    tab_id: TabId,
    window_id: WindowId,
) -> Result<(), CommandError> {
    let tabs = host.query_tabs(TabQuery::Window(window_id)).await?;
    let doomed: Vec<TabId> = tabs
        .iter()
        .filter(|t| t.id != tab_id && !t.pinned)
        .map(|t| t.id)
        .collect();
    close_each(host, &doomed).await
}

/// Closes every unpinned tab positioned right of `tab_id`.
pub async fn close_tabs_to_right<H: TabHost>(
    host: &H,
    tab_id: TabId,
    window_id: WindowId,
) -> Result<(), CommandError> {
    let tabs = host.query_tabs(TabQuery::Window(window_id)).await?;
    let reference = tabs
        .iter()
        .find(|t| t.id == tab_id)
        .ok_or_else(|| CommandError::NotFound("Tab not found".to_string()))?;
    let doomed: Vec<TabId> = tabs
        .iter()
        .filter(|t| t.index > reference.index && !t.pinned)
        .map(|t| t.id)
        .collect();
    close_each(host, &doomed).await
}

/// Issues one independent close per tab and waits for all of them.
async fn close_each<H: TabHost>(host: &H, tab_ids: &[TabId]) -> Result<(), CommandError> {
    let outcomes = join_all(tab_ids.iter().map(|id| host.remove_tabs(std::slice::from_ref(id)))).await;
    aggregate(outcomes)
}

/// Folds independent outcomes into one result; any failure fails the batch.
fn aggregate(outcomes: Vec<Result<(), HostError>>) -> Result<(), CommandError> {
    let total = outcomes.len();
    let failures: Vec<HostError> = outcomes.into_iter().filter_map(Result::err).collect();
    match failures.first() {
        None => Ok(()),
        Some(first) => Err(CommandError::BatchFailed {
            failed: failures.len(),
            total,
            first: first.to_string(),
        }),
    }
}

pub async fn toggle_pin<H: TabHost>(host: &H, tab_id: TabId) -> Result<(), CommandError> {
    let tab = host.get_tab(tab_id).await?;
    host.update_tab(tab_id, TabUpdate::pinned(!tab.pinned)).await?;
    Ok(())
}

pub async fn add_tabs_to_group<H: TabHost>(
    host: &H,
    tab_ids: &[TabId],
    group_id: GroupId,
) -> Result<(), CommandError> {
    if tab_ids.is_empty() {
        return Err(CommandError::EmptyTarget("No tabs to group".to_string()));
    }
    host.group_tabs(tab_ids, Some(group_id)).await?;
    Ok(())
}

/// Creates a group from `tab_ids`, then styles it.
///
/// A styling failure is reported but the new group is left in place.
async fn create_group<H: TabHost>(
    host: &H,
    ctx: &DispatchContext<'_>,
    tab_ids: &[TabId],
    title: Option<String>,
    color: Option<GroupColor>,
) -> Result<GroupId, CommandError> {
    if tab_ids.is_empty() {
        return Err(CommandError::EmptyTarget("No tabs to group".to_string()));
    }
    let group_id = host.group_tabs(tab_ids, None).await?;
    let title = title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| ctx.new_group_title.to_string());
    let color = color.unwrap_or_else(|| ctx.colors.pick());
    let update = GroupUpdate {
        title: Some(title),
        color: Some(color),
        collapsed: None,
    };
    host.update_group(group_id, update).await?;
    Ok(group_id)
}

/// Repositions then regroups a tab. Both steps run even when the first fails.
pub async fn move_tab<H: TabHost>(
    host: &H,
    tab_id: TabId,
    target_index: Option<i32>,
    target_group: Option<GroupTarget>,
) -> Result<(), CommandError> {
    let mut first_failure: Option<CommandError> = None;

    if let Some(index) = target_index.and_then(|i| usize::try_from(i).ok()) {
        if let Err(e) = host.move_tabs(&[tab_id], index).await {
            first_failure = Some(e.into());
        }
    }

    if let Some(target) = target_group {
        let step = match target {
            GroupTarget::Ungroup => host.ungroup_tabs(&[tab_id]).await,
            GroupTarget::Group(group_id) => host.group_tabs(&[tab_id], Some(group_id)).await.map(|_| ()),
        };
        if let Err(e) = step {
            match &first_failure {
                Some(_) => warn!("MOVE_TAB group step for tab {} also failed: {}", tab_id, e),
                None => first_failure = Some(e.into()),
            }
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub async fn update_group<H: TabHost>(
    host: &H,
    group_id: GroupId,
    update: GroupUpdate,
) -> Result<(), CommandError> {
    host.update_group(group_id, update).await?;
    Ok(())
}

/// Ids of a group's tabs in position order.
async fn group_members<H: TabHost>(host: &H, group_id: GroupId) -> Result<Vec<TabId>, CommandError> {
    let mut tabs = host.query_tabs(TabQuery::Group(group_id)).await?;
    tabs.sort_by_key(|t| t.index);
    Ok(tabs.into_iter().map(|t| t.id).collect())
}

/// Closes every tab of a group in one batch. An empty group is a no-op.
pub async fn close_group_tabs<H: TabHost>(host: &H, group_id: GroupId) -> Result<(), CommandError> {
    let members = group_members(host, group_id).await?;
    if members.is_empty() {
        return Ok(());
    }
    host.remove_tabs(&members).await?;
    Ok(())
}

/// Ungroups every tab of a group, keeping the tabs open. An empty group is a no-op.
pub async fn ungroup<H: TabHost>(host: &H, group_id: GroupId) -> Result<(), CommandError> {
    let members = group_members(host, group_id).await?;
    if members.is_empty() {
        return Ok(());
    }
    host.ungroup_tabs(&members).await?;
    Ok(())
}

/// Moves a whole group, preserving member order, so its first tab lands at `target_index`.
pub async fn move_group<H: TabHost>(
    host: &H,
    group_id: GroupId,
    target_index: usize,
) -> Result<(), CommandError> {
    let members = group_members(host, group_id).await?;
    if members.is_empty() {
        return Err(CommandError::EmptyTarget("Group has no tabs".to_string()));
    }
    host.move_tabs(&members, target_index).await?;
    Ok(())
}
