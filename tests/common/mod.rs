// Shared test helpers: an in-memory ContainerEngine that records every call

#![allow(dead_code)]

use async_trait::async_trait;
use bollard::models::EndpointSettings;
use dockboard::config::AppConfig;
use dockboard::docker_repo::{ContainerEngine, EngineError};
use dockboard::models::{ContainerState, ContainerSummary, StatsSnapshot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const PROJECT_LABEL: &str = "com.docker.compose.project";

pub const TEST_CONFIG: &str = r#"
[server]
port = 3000
host = "127.0.0.1"

[engine]
project_label = "com.docker.compose.project"
fallback_group = "ungrouped"

[auth]
username = "admin"
password = "hunter2"
session_secret = "test-secret-test-secret-test-secret"
"#;

pub fn test_config() -> AppConfig {
    AppConfig::load_from_str(TEST_CONFIG).unwrap()
}

pub fn container(id: &str, project: Option<&str>, state: &str) -> ContainerSummary {
    let mut labels = HashMap::new();
    if let Some(p) = project {
        labels.insert(PROJECT_LABEL.to_string(), p.to_string());
    }
    ContainerSummary {
        id: id.into(),
        name: format!("{}-name", id),
        image: "alpine:3".into(),
        status: String::new(),
        state: ContainerState::from_docker(state),
        labels,
    }
}

#[derive(Default)]
pub struct FakeEngine {
    pub containers: Mutex<Vec<ContainerSummary>>,
    pub stats: Mutex<HashMap<String, StatsSnapshot>>,
    pub networks: Mutex<HashMap<String, HashMap<String, EndpointSettings>>>,
    /// Calls in order, e.g. "list", "start:a", "remove:b:force".
    pub calls: Mutex<Vec<String>>,
    /// Calls (same format as `calls`) that fail with the given message.
    pub failures: Mutex<HashMap<String, String>>,
    /// Calls that are recorded, then wait for their `Notify` before returning.
    pub gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeEngine {
    pub fn with_containers(containers: Vec<ContainerSummary>) -> Self {
        let engine = Self::default();
        *engine.containers.lock().unwrap() = containers;
        engine
    }

    pub fn fail(&self, call: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(call.to_string(), message.to_string());
    }

    /// Hold `call` open until the returned handle is notified.
    pub fn gate(&self, call: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(call.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than listing.
    pub fn actions(&self) -> Vec<String> {
        self.calls().into_iter().filter(|c| c != "list").collect()
    }

    async fn record(&self, call: String) -> Result<(), EngineError> {
        self.calls.lock().unwrap().push(call.clone());
        let gate = self.gates.lock().unwrap().get(&call).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.failures.lock().unwrap().get(&call) {
            Some(msg) => Err(EngineError::Api(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn list_containers(&self, _all: bool) -> Result<Vec<ContainerSummary>, EngineError> {
        self.record("list".into()).await?;
        Ok(self.containers.lock().unwrap().clone())
    }

    async fn stats(&self, id: &str) -> Result<StatsSnapshot, EngineError> {
        self.record(format!("stats:{}", id)).await?;
        self.stats
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::Api(format!("No such container: {}", id)))
    }

    async fn networks(&self, id: &str) -> Result<HashMap<String, EndpointSettings>, EngineError> {
        self.record(format!("networks:{}", id)).await?;
        self.networks
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::Api(format!("No such container: {}", id)))
    }

    async fn start(&self, id: &str) -> Result<(), EngineError> {
        self.record(format!("start:{}", id)).await
    }

    async fn stop(&self, id: &str) -> Result<(), EngineError> {
        self.record(format!("stop:{}", id)).await
    }

    async fn remove(&self, id: &str, force: bool) -> Result<(), EngineError> {
        let suffix = if force { ":force" } else { "" };
        self.record(format!("remove:{}{}", id, suffix)).await
    }
}
