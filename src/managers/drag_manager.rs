//! Drag-and-drop targeting for tabs and groups.
//!
//! At most one thing is dragged at a time. The pointer position is reduced
//! to a `DropTarget` by the caller; this module decides what indicator to
//! show while hovering and which command a drop produces.

use log::debug;

use crate::types::command::Command;
use crate::types::errors::DragError;
use crate::types::group::GroupTarget;
use crate::types::snapshot::TabSnapshot;
use crate::types::tab::{GroupId, TabId};

/// Vertical extent of a row or group block, in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Which half of the target the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

impl Placement {
    /// Above the midpoint is `Before`; the midpoint itself and below is `After`.
    pub fn from_cursor(cursor_y: f64, bounds: Bounds) -> Self {
        if cursor_y < bounds.midpoint() {
            Placement::Before
        } else {
            Placement::After
        }
    }
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dragged {
    Tab { tab_id: TabId, membership: GroupTarget },
    Group(GroupId),
}

/// Element under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    /// Anywhere on a group block; `placement` is relative to the whole block.
    Group { group_id: GroupId, placement: Placement },
    /// A group's header row.
    GroupHeader(GroupId),
    /// A tab row.
    Tab { tab_id: TabId, placement: Placement },
    /// Empty space in the ungrouped section.
    Ungrouped,
}

/// Highlight drawn while hovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndicator {
    GroupAbove(GroupId),
    GroupBelow(GroupId),
    Header(GroupId),
    TabAbove(TabId),
    TabBelow(TabId),
}

#[derive(Debug, Clone, Default)]
pub struct DragManager {
    dragged: Option<Dragged>,
}

impl DragManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragged(&self) -> Option<Dragged> {
        self.dragged
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    /// Starts dragging a tab. Pinned tabs cannot be dragged.
    pub fn start_tab(&mut self, tab_id: TabId, snapshot: &TabSnapshot) -> Result<(), DragError> {
        let tab = snapshot.find_tab(tab_id).ok_or(DragError::UnknownTab(tab_id))?;
        if tab.pinned {
            return Err(DragError::PinnedTab(tab_id));
        }
        self.dragged = Some(Dragged::Tab {
            tab_id,
            membership: GroupTarget::for_membership(tab.group_id),
        });
        debug!("Dragging tab {}", tab_id);
        Ok(())
    }

    pub fn start_group(&mut self, group_id: GroupId, snapshot: &TabSnapshot) -> Result<(), DragError> {
        if snapshot.find_group(group_id).is_none() {
            return Err(DragError::UnknownGroup(group_id));
        }
        self.dragged = Some(Dragged::Group(group_id));
        debug!("Dragging group {}", group_id);
        Ok(())
    }

    /// Indicator for hovering over `target`, or `None` when a drop there does nothing.
    pub fn hover(&self, target: DropTarget) -> Option<DropIndicator> {
        match (self.dragged?, target) {
            (Dragged::Group(dragged), DropTarget::Group { group_id, placement }) if group_id != dragged => {
                Some(match placement {
                    Placement::Before => DropIndicator::GroupAbove(group_id),
                    Placement::After => DropIndicator::GroupBelow(group_id),
                })
            }
            (Dragged::Tab { membership, .. }, DropTarget::GroupHeader(group_id))
                if membership != GroupTarget::Group(group_id) =>
            {
                Some(DropIndicator::Header(group_id))
            }
            (Dragged::Tab { tab_id: dragged, .. }, DropTarget::Tab { tab_id, placement }) if tab_id != dragged => {
                Some(match placement {
                    Placement::Before => DropIndicator::TabAbove(tab_id),
                    Placement::After => DropIndicator::TabBelow(tab_id),
                })
            }
            _ => None,
        }
    }

    /// Finishes the drag over `target` and returns the command to send, if any.
    ///
    /// The drag ends whether or not a command is produced. Target indices
    /// count positions with the dragged tabs already taken out.
    pub fn drop(&mut self, target: DropTarget, snapshot: &TabSnapshot) -> Option<Command> {
        let dragged = self.dragged.take()?;
        let command = match dragged {
            Dragged::Group(group_id) => drop_group(group_id, target, snapshot),
            Dragged::Tab { tab_id, membership } => drop_tab(tab_id, membership, target, snapshot),
        };
        if command.is_none() {
            debug!("Drop of {:?} on {:?} ignored", dragged, target);
        }
        command
    }

    /// Abandons the drag without a drop.
    pub fn end(&mut self) {
        self.dragged = None;
    }
}

/// Converts an insertion point in the current order into one in the order the
/// host sees once the dragged tabs have been taken out.
fn index_after_removal(position: usize, dragged: impl Iterator<Item = usize>) -> usize {
    position - dragged.filter(|index| *index < position).count()
}

/// A group dropped on another group lands before its first tab or after its last.
fn drop_group(group_id: GroupId, target: DropTarget, snapshot: &TabSnapshot) -> Option<Command> {
    let DropTarget::Group {
        group_id: target_id,
        placement,
    } = target
    else {
        return None;
    };
    if target_id == group_id {
        return None;
    }
    let target_group = snapshot.find_group(target_id)?;
    let position = match placement {
        Placement::Before => target_group.first_tab_index?,
        Placement::After => target_group.last_tab_index()? + 1,
    };
    let dragged = snapshot.find_group(group_id)?.tabs.iter().map(|t| t.index);
    let target_index = index_after_removal(position, dragged);
    Some(Command::MoveGroup {
        group_id,
        target_index,
    })
}

fn drop_tab(
    tab_id: TabId,
    membership: GroupTarget,
    target: DropTarget,
    snapshot: &TabSnapshot,
) -> Option<Command> {
    match target {
        // Joins the group without repositioning.
        DropTarget::GroupHeader(group_id) if membership != GroupTarget::Group(group_id) => {
            Some(Command::MoveTab {
                tab_id,
                target_index: None,
                target_group_id: Some(GroupTarget::Group(group_id)),
            })
        }
        DropTarget::Tab {
            tab_id: target_id,
            placement,
        } if target_id != tab_id => {
            let target_tab = snapshot.find_tab(target_id)?;
            let position = match placement {
                Placement::Before => target_tab.index,
                Placement::After => target_tab.index + 1,
            };
            let dragged_index = snapshot.find_tab(tab_id)?.index;
            let index = index_after_removal(position, std::iter::once(dragged_index));
            let target_membership = GroupTarget::for_membership(target_tab.group_id);
            Some(Command::MoveTab {
                tab_id,
                target_index: i32::try_from(index).ok(),
                target_group_id: (target_membership != membership).then_some(target_membership),
            })
        }
        // Leaves the group without an index change.
        DropTarget::Ungrouped if membership != GroupTarget::Ungroup => Some(Command::MoveTab {
            tab_id,
            target_index: None,
            target_group_id: Some(GroupTarget::Ungroup),
        }),
        _ => None,
    }
}
