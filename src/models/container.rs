// Docker container models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Docker container state as reported by the engine's listing.
///
/// Serializes to the engine's lowercase string (e.g. "running"); states this
/// dashboard does not know keep their raw text in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Created,
    Paused,
    Restarting,
    Removing,
    Dead,
    Other(String),
}

impl ContainerState {
    /// Parse from Docker API state string. Matching is exact: "Running" is `Other`.
    pub fn from_docker(s: &str) -> Self {
        match s {
            "running" => ContainerState::Running,
            "exited" => ContainerState::Exited,
            "created" => ContainerState::Created,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "dead" => ContainerState::Dead,
            other => ContainerState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContainerState::Running => "running",
            ContainerState::Exited => "exited",
            ContainerState::Created => "created",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Dead => "dead",
            ContainerState::Other(raw) => raw,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ContainerState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContainerState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ContainerState::from_docker(&s))
    }
}

/// One row of the engine's container listing, trimmed to what the dashboard uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Human status line from the engine, e.g. "Up 3 hours".
    #[serde(default)]
    pub status: String,
    pub state: ContainerState,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl ContainerSummary {
    /// Label value, treating an empty string like an absent label.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl From<bollard::models::ContainerSummary> for ContainerSummary {
    fn from(c: bollard::models::ContainerSummary) -> Self {
        let id = c.id.unwrap_or_default();
        let name = c
            .names
            .as_ref()
            .and_then(|n| n.first())
            .map(|n| n.trim_start_matches('/').to_string())
            .unwrap_or_else(|| id.clone());
        let state = c
            .state
            .as_ref()
            .map(|s| ContainerState::from_docker(&s.to_string()))
            .unwrap_or_else(|| ContainerState::Other(String::new()));
        Self {
            id,
            name,
            image: c.image.unwrap_or_default(),
            status: c.status.unwrap_or_default(),
            state,
            labels: c.labels.unwrap_or_default(),
        }
    }
}
