// Docker engine access via bollard

mod stats;

use crate::models::{ContainerSummary, StatsSnapshot};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::EndpointSettings;
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions, StatsOptions, StopContainerOptions,
};
use futures_util::StreamExt;
use std::collections::HashMap;

/// Seconds bollard waits on a single engine request.
const ENGINE_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine rejected or failed the call; the message is the engine's own.
    #[error("{0}")]
    Api(String),
    #[error("no stats returned for container {0}")]
    NoStats(String),
}

impl From<bollard::errors::Error> for EngineError {
    fn from(e: bollard::errors::Error) -> Self {
        EngineError::Api(e.to_string())
    }
}

/// The container operations the dashboard needs from an engine.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, EngineError>;

    /// One non-streaming stats sample (current and previous counters).
    async fn stats(&self, id: &str) -> Result<StatsSnapshot, EngineError>;

    /// Network endpoints attached to the container, keyed by network name.
    async fn networks(&self, id: &str) -> Result<HashMap<String, EndpointSettings>, EngineError>;

    async fn start(&self, id: &str) -> Result<(), EngineError>;

    async fn stop(&self, id: &str) -> Result<(), EngineError>;

    async fn remove(&self, id: &str, force: bool) -> Result<(), EngineError>;
}

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect to `socket` if given, otherwise to the platform's unix defaults.
    pub fn connect(socket: Option<&str>) -> anyhow::Result<Self> {
        let docker = match socket {
            Some(path) => {
                Docker::connect_with_socket(path, ENGINE_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)?
            }
            None => Docker::connect_with_unix_defaults()?,
        };
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerEngine for DockerRepo {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, EngineError> {
        let options = ListContainersOptions {
            all,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers.into_iter().map(ContainerSummary::from).collect())
    }

    async fn stats(&self, id: &str) -> Result<StatsSnapshot, EngineError> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        match stream.next().await {
            Some(Ok(s)) => Ok(stats::snapshot_from_response(&s)),
            Some(Err(e)) => Err(e.into()),
            None => Err(EngineError::NoStats(id.to_string())),
        }
    }

    async fn networks(&self, id: &str) -> Result<HashMap<String, EndpointSettings>, EngineError> {
        let info = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        Ok(info
            .network_settings
            .and_then(|n| n.networks)
            .unwrap_or_default())
    }

    async fn start(&self, id: &str) -> Result<(), EngineError> {
        self.docker
            .start_container(id, None::<StartContainerOptions>)
            .await?;
        Ok(())
    }

    async fn stop(&self, id: &str) -> Result<(), EngineError> {
        self.docker
            .stop_container(id, None::<StopContainerOptions>)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: &str, force: bool) -> Result<(), EngineError> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.docker.remove_container(id, Some(options)).await?;
        Ok(())
    }
}
