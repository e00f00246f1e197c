// Container and group actions against the engine.
//
// Group fan-out runs sequentially and stops at the first failing call; containers
// already acted on stay that way. Actions on one group, or on one container, are
// serialized through per-key locks.

use crate::docker_repo::{ContainerEngine, EngineError};
use crate::models::ContainerState;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Delete,
}

impl ContainerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Delete => "delete",
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    Start,
    Stop,
}

impl GroupAction {
    /// Whether a member in `state` still needs this action.
    pub fn applies_to(&self, state: &ContainerState) -> bool {
        match self {
            GroupAction::Start => !state.is_running(),
            GroupAction::Stop => state.is_running(),
        }
    }

    fn as_container_action(&self) -> ContainerAction {
        match self {
            GroupAction::Start => ContainerAction::Start,
            GroupAction::Stop => ContainerAction::Stop,
        }
    }
}

impl fmt::Display for GroupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_container_action().as_str())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported action: {0:?} (expected \"start\" or \"stop\")")]
pub struct ParseActionError(pub String);

impl FromStr for GroupAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(GroupAction::Start),
            "stop" => Ok(GroupAction::Stop),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

/// Counts from a completed group action, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupActionReport {
    pub matched: usize,
    pub acted: usize,
    pub skipped: usize,
}

/// Async mutex per string key. Entries nobody holds are dropped on the next acquire.
#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|k, m| k == key || Arc::strong_count(m) > 1);
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

pub struct Dispatcher {
    engine: Arc<dyn ContainerEngine>,
    project_label: String,
    group_locks: KeyedLocks,
    container_locks: KeyedLocks,
}

impl Dispatcher {
    pub fn new(engine: Arc<dyn ContainerEngine>, project_label: impl Into<String>) -> Self {
        Self {
            engine,
            project_label: project_label.into(),
            group_locks: KeyedLocks::default(),
            container_locks: KeyedLocks::default(),
        }
    }

    /// Apply `action` to one container without checking its current state.
    /// Delete always forces removal.
    #[instrument(skip_all, fields(container = %id, action = %action))]
    pub async fn apply(&self, id: &str, action: ContainerAction) -> Result<(), EngineError> {
        let _guard = self.container_locks.acquire(id).await;
        let result = match action {
            ContainerAction::Start => self.engine.start(id).await,
            ContainerAction::Stop => self.engine.stop(id).await,
            ContainerAction::Delete => self.engine.remove(id, true).await,
        };
        match &result {
            Ok(()) => info!("container action applied"),
            Err(e) => warn!(error = %e, "container action failed"),
        }
        result
    }

    /// Apply `action` to every container whose project label equals `group`,
    /// skipping members already in the target state.
    #[instrument(skip_all, fields(group = %group, action = %action))]
    pub async fn apply_group(
        &self,
        group: &str,
        action: GroupAction,
    ) -> Result<GroupActionReport, EngineError> {
        let _group_guard = self.group_locks.acquire(group).await;

        // Always act on a fresh listing.
        let containers = self.engine.list_containers(true).await.inspect_err(|e| {
            warn!(error = %e, "listing containers for group action failed");
        })?;

        let mut report = GroupActionReport::default();
        for c in containers
            .iter()
            .filter(|c| c.labels.get(&self.project_label).map(String::as_str) == Some(group))
        {
            report.matched += 1;
            if !action.applies_to(&c.state) {
                report.skipped += 1;
                continue;
            }
            let _guard = self.container_locks.acquire(&c.id).await;
            let result = match action {
                GroupAction::Start => self.engine.start(&c.id).await,
                GroupAction::Stop => self.engine.stop(&c.id).await,
            };
            if let Err(e) = result {
                warn!(
                    container = %c.name,
                    error = %e,
                    acted = report.acted,
                    "group action aborted"
                );
                return Err(e);
            }
            report.acted += 1;
        }

        info!(
            matched = report.matched,
            acted = report.acted,
            skipped = report.skipped,
            "group action applied"
        );
        Ok(report)
    }
}
