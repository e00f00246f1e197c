// Group containers by their compose project label and derive each group's status.

use crate::models::{ContainerSummary, Group, GroupStatus};
use std::collections::BTreeMap;

/// Group name -> group, ordered by name for stable rendering.
pub type Grouping = BTreeMap<String, Group>;

/// Label key and fallback group name used when partitioning containers.
#[derive(Debug, Clone)]
pub struct GroupingRule {
    pub label: String,
    pub fallback: String,
}

impl GroupingRule {
    pub fn new(label: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fallback: fallback.into(),
        }
    }

    /// The group a container belongs to. Exact string match, no normalization.
    pub fn key_for<'a>(&'a self, c: &'a ContainerSummary) -> &'a str {
        c.label(&self.label).unwrap_or(&self.fallback)
    }

    /// Partition `containers` into groups. Member order within a group follows input order.
    pub fn group(&self, containers: Vec<ContainerSummary>) -> Grouping {
        let mut members: BTreeMap<String, Vec<ContainerSummary>> = BTreeMap::new();
        for c in containers {
            let key = self.key_for(&c).to_string();
            members.entry(key).or_default().push(c);
        }
        members
            .into_iter()
            .map(|(key, containers)| (key, aggregate(containers)))
            .collect()
    }
}

fn aggregate(containers: Vec<ContainerSummary>) -> Group {
    let running_count = containers.iter().filter(|c| c.state.is_running()).count();
    let total = containers.len();
    Group {
        status: GroupStatus::from_counts(running_count, total),
        running_count,
        total,
        containers,
    }
}
