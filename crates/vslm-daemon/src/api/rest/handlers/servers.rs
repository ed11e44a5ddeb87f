//! Server management handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use vslm_control::ActionOutcome;
use vslm_registry::NewServer;
use vslm_types::{LifecycleEvent, Server, ServerAction, ServerId, ServerStatus};

/// Create server request body
#[derive(Debug, Deserialize)]
pub struct CreateServerRequest {
    pub region: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Create server response
#[derive(Debug, Serialize)]
pub struct CreateServerResponse {
    pub message: String,
    pub id: ServerId,
    pub status: ServerStatus,
}

/// Create a new server
pub async fn create_server(
    State(state): State<AppState>,
    Json(request): Json<CreateServerRequest>,
) -> ApiResult<(StatusCode, Json<CreateServerResponse>)> {
    let server = state
        .control
        .create_server(NewServer {
            region: request.region,
            kind: request.kind,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateServerResponse {
            message: "success".to_string(),
            id: server.id,
            status: server.status,
        }),
    ))
}

/// Single-server response
#[derive(Debug, Serialize)]
pub struct ServerResponse {
    pub message: String,
    pub server: Server,
}

/// Get a specific server
pub async fn get_server(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ServerResponse>> {
    let server_id = parse_server_id(&id)?;
    let server = state.control.get_server(&server_id).await?;

    Ok(Json(ServerResponse {
        message: "Server details fetched successfully".to_string(),
        server,
    }))
}

/// Server list response
#[derive(Debug, Serialize)]
pub struct ListServersResponse {
    pub message: String,
    pub server: Vec<Server>,
}

/// List all servers
pub async fn list_servers(State(state): State<AppState>) -> ApiResult<Json<ListServersResponse>> {
    let servers = state.control.list_servers().await?;

    Ok(Json(ListServersResponse {
        message: "Server list fetched successfully".to_string(),
        server: servers,
    }))
}

/// Action request body
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

/// Action response
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub message: String,
    pub server: Server,
}

/// Apply a lifecycle action to a server
pub async fn apply_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse>> {
    let server_id = parse_server_id(&id)?;
    let action: ServerAction = request
        .action
        .parse()
        .map_err(|e: vslm_types::UnknownAction| ApiError::BadRequest(e.to_string()))?;

    let outcome = state.control.apply_action(&server_id, action).await?;

    let (message, server) = match outcome {
        ActionOutcome::Completed { server, .. } => (
            "Server action completed successfully".to_string(),
            server,
        ),
        ActionOutcome::NoChange { server } => (
            format!(
                "Action '{}' processed for server. Status remains '{}'.",
                action, server.status
            ),
            server,
        ),
    };

    Ok(Json(ActionResponse { message, server }))
}

/// Logs query params
#[derive(Debug, Deserialize)]
pub struct GetLogsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// Server logs response
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub message: String,
    pub events: Vec<LifecycleEvent>,
}

/// Get the audit trail for a server
pub async fn get_server_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<GetLogsQuery>,
) -> ApiResult<Json<LogsResponse>> {
    let server_id = parse_server_id(&id)?;
    let events = state
        .control
        .events_for_server(&server_id, query.limit)
        .await?;

    Ok(Json(LogsResponse {
        message: "Server logs fetched successfully".to_string(),
        events,
    }))
}

/// Helper to parse server ID from string (UUID-based)
fn parse_server_id(id: &str) -> ApiResult<ServerId> {
    let uuid_str = id.strip_prefix("server:").unwrap_or(id);
    let uuid = uuid::Uuid::parse_str(uuid_str)
        .map_err(|_| ApiError::BadRequest(format!("Invalid server ID: {}", id)))?;
    Ok(ServerId::from_uuid(uuid))
}
