use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tab::{GroupId, WindowId};

/// The eight colors a tab group can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl GroupColor {
    pub const ALL: [GroupColor; 8] = [
        GroupColor::Blue,
        GroupColor::Red,
        GroupColor::Yellow,
        GroupColor::Green,
        GroupColor::Pink,
        GroupColor::Purple,
        GroupColor::Cyan,
        GroupColor::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Orange => "orange",
        }
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupColor::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown group color: {}", s))
    }
}

/// A tab group as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: GroupId,
    pub window_id: WindowId,
    #[serde(default)]
    pub title: String,
    pub color: GroupColor,
    #[serde(default)]
    pub collapsed: bool,
}

/// Partial update applied through `TabHost::update_group`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupUpdate {
    pub title: Option<String>,
    pub color: Option<GroupColor>,
    pub collapsed: Option<bool>,
}

/// Destination of a tab's group membership in a move.
///
/// On the wire this is an integer: `-1` ungroups, any other value names a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum GroupTarget {
    Ungroup,
    Group(GroupId),
}

impl GroupTarget {
    pub const UNGROUP_SENTINEL: i32 = -1;

    /// Target for a tab that should end up in `group_id`, or ungrouped for `None`.
    pub fn for_membership(group_id: Option<GroupId>) -> Self {
        match group_id {
            Some(id) => GroupTarget::Group(id),
            None => GroupTarget::Ungroup,
        }
    }
}

impl From<i32> for GroupTarget {
    fn from(raw: i32) -> Self {
        if raw == Self::UNGROUP_SENTINEL {
            GroupTarget::Ungroup
        } else {
            GroupTarget::Group(raw)
        }
    }
}

impl From<GroupTarget> for i32 {
    fn from(target: GroupTarget) -> Self {
        match target {
            GroupTarget::Ungroup => GroupTarget::UNGROUP_SENTINEL,
            GroupTarget::Group(id) => id,
        }
    }
}
