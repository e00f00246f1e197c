// Container group models

use serde::Serialize;

use super::ContainerSummary;

/// Aggregate run status of a group; serializes to lowercase JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Stopped,
    Running,
    Partial,
}

impl GroupStatus {
    /// `running` out of `total` members are running. `total` is never zero for a real group.
    pub fn from_counts(running: usize, total: usize) -> Self {
        if running == 0 {
            GroupStatus::Stopped
        } else if running == total {
            GroupStatus::Running
        } else {
            GroupStatus::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Stopped => "stopped",
            GroupStatus::Running => "running",
            GroupStatus::Partial => "partial",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub containers: Vec<ContainerSummary>,
    pub status: GroupStatus,
    pub running_count: usize,
    pub total: usize,
}
