// JSON API handlers: container/group actions and per-container metrics

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use crate::dispatcher::{ContainerAction, GroupAction, ParseActionError};
use crate::docker_repo::EngineError;
use crate::metrics;
use crate::models::{CpuUsage, MemoryUsage, NetworkInfo};

/// Error body `{error}` with a status code.
#[derive(Debug)]
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Engine failure with a context prefix, e.g. "Error fetching CPU usage: ".
    fn engine_with_prefix(prefix: &str, e: EngineError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{}{}", prefix, e),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// GET /api/containers — current grouping for client-side polling.
pub(super) async fn list_groups(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let containers = state.engine.list_containers(true).await?;
    let groups = state.grouping.group(containers);
    Ok(Json(json!({ "groups": groups })))
}

async fn container_action(
    state: &AppState,
    id: &str,
    action: ContainerAction,
) -> Result<Json<Value>, ApiError> {
    state.dispatcher.apply(id, action).await?;
    Ok(success())
}

pub(super) async fn start_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    container_action(&state, &id, ContainerAction::Start).await
}

pub(super) async fn stop_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    container_action(&state, &id, ContainerAction::Stop).await
}

pub(super) async fn delete_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    container_action(&state, &id, ContainerAction::Delete).await
}

#[derive(Deserialize)]
pub(super) struct GroupActionRequest {
    action: String,
}

/// POST /api/group-action/:group with `{"action": "start" | "stop"}`.
pub(super) async fn group_action(
    State(state): State<AppState>,
    Path(group): Path<String>,
    body: Result<Json<GroupActionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let action: GroupAction = request
        .action
        .parse()
        .map_err(|e: ParseActionError| ApiError::bad_request(e.to_string()))?;
    state.dispatcher.apply_group(&group, action).await?;
    Ok(success())
}

pub(super) async fn cpu_usage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CpuUsage>, ApiError> {
    let stats = state
        .engine
        .stats(&id)
        .await
        .map_err(|e| ApiError::engine_with_prefix("Error fetching CPU usage: ", e))?;
    Ok(Json(metrics::cpu_usage(&id, &stats)))
}

pub(super) async fn ram_usage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MemoryUsage>, ApiError> {
    let stats = state
        .engine
        .stats(&id)
        .await
        .map_err(|e| ApiError::engine_with_prefix("Error fetching RAM usage: ", e))?;
    Ok(Json(metrics::memory_usage(&id, &stats)))
}

pub(super) async fn network_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NetworkInfo>, ApiError> {
    let networks = state
        .engine
        .networks(&id)
        .await
        .map_err(|e| ApiError::engine_with_prefix("Error fetching network information: ", e))?;
    Ok(Json(NetworkInfo {
        container_id: id,
        network_info: networks,
    }))
}
