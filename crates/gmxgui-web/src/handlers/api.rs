//! JSON API mirroring the dashboard actions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use gmxgui_common::error::{ApiError, GmxGuiError};
use gmxgui_common::forcefield::{self, ForceField, FORCEFIELDS};
use gmxgui_monitoring::ConnectivityState;
use gmxgui_projects::{DeleteOutcome, FileRecord, Project, ProjectStats, SimulationParams, View};

use crate::state::{AppEvent, SharedState};

// === API Types ===

#[derive(Debug, Deserialize, Default)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttachFileRequest {
    pub name: String,
    /// Defaults to the file name's extension.
    pub file_type: Option<String>,
    /// Defaults to a fabricated size.
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ForceFieldRequest {
    pub forcefield: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigureRequest {
    pub forcefield: String,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub time_step: Option<f64>,
    pub total_time: Option<f64>,
    pub gpu_enabled: Option<bool>,
    pub ntomp: Option<u32>,
    pub ntmpi: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub started: bool,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub selected: Option<String>,
    pub view: View,
}

fn require_forcefield(id: &str) -> Result<(), ApiError> {
    match forcefield::find(id) {
        Some(_) => Ok(()),
        None => Err(GmxGuiError::UnknownForceField(id.to_string()).into()),
    }
}

// === API Endpoints ===

/// GET /api/projects - newest first
pub async fn list_projects(State(state): State<SharedState>) -> Json<Vec<Project>> {
    let projects = state.manager.read().await.projects().to_vec();
    Json(projects)
}

/// POST /api/projects - the body is optional
pub async fn create_project(
    State(state): State<SharedState>,
    req: Option<Json<CreateProjectRequest>>,
) -> impl IntoResponse {
    let req = req.map(|Json(req)| req).unwrap_or_default();
    let project = state.manager.write().await
        .create_with_description(req.name, req.description)
        .clone();
    state.emit(AppEvent::ProjectCreated {
        project_id: project.id.clone(),
        name: project.name.clone(),
    });
    (StatusCode::CREATED, Json(project))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = state.manager.read().await.get(&id).cloned();
    project.map(Json).ok_or(ApiError::NotFound(id))
}

/// DELETE /api/projects/{id}?confirm=true
pub async fn delete_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = state.manager.write().await.delete(&id, |_: &str| query.confirm);
    match outcome {
        DeleteOutcome::Deleted => {
            state.emit(AppEvent::ProjectDeleted { project_id: id.clone() });
            Ok(Json(serde_json::json!({ "deleted": id })))
        }
        DeleteOutcome::Declined => Err(ApiError::ConfirmationRequired(id)),
        DeleteOutcome::NotFound => Err(ApiError::NotFound(id)),
    }
}

/// POST /api/projects/{id}/files
pub async fn attach_file(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<AttachFileRequest>,
) -> Result<Json<Project>, ApiError> {
    let mut file = FileRecord::fabricate(req.name, req.file_type.unwrap_or_default());
    if let Some(size) = req.size {
        file.size = size;
    }
    let file_name = file.name.clone();

    let project = state.manager.write().await
        .attach_file(&id, file)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(id.clone()))?;
    state.emit(AppEvent::FileAttached { project_id: id, file_name });
    Ok(Json(project))
}

/// POST /api/projects/{id}/forcefield
pub async fn select_forcefield(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<ForceFieldRequest>,
) -> Result<Json<Project>, ApiError> {
    require_forcefield(&req.forcefield)?;

    let project = state.update_project(&id, |m| m.select_forcefield(&id, &req.forcefield)).await;
    project.map(Json).ok_or(ApiError::NotFound(id))
}

/// POST /api/projects/{id}/configure
pub async fn configure_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<ConfigureRequest>,
) -> Result<Json<Project>, ApiError> {
    require_forcefield(&req.forcefield)?;

    let defaults = SimulationParams::with_forcefield(req.forcefield);
    let params = SimulationParams {
        temperature: req.temperature.unwrap_or(defaults.temperature),
        pressure: req.pressure.unwrap_or(defaults.pressure),
        time_step: req.time_step.unwrap_or(defaults.time_step),
        total_time: req.total_time.unwrap_or(defaults.total_time),
        gpu_enabled: req.gpu_enabled.unwrap_or(defaults.gpu_enabled),
        ntomp: req.ntomp.unwrap_or(defaults.ntomp),
        ntmpi: req.ntmpi.unwrap_or(defaults.ntmpi),
        ..defaults
    };

    let project = state.update_project(&id, |m| m.configure(&id, params)).await;
    project.map(Json).ok_or(ApiError::NotFound(id))
}

/// POST /api/projects/{id}/start
pub async fn start_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<StartResponse>, ApiError> {
    let started = state.runner.start(&id).await;
    let project = state.manager.read().await
        .get(&id)
        .cloned()
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(StartResponse { started, project }))
}

/// GET /api/projects/{id}/logs - log of the most recent run
pub async fn project_logs(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<LogsResponse>, ApiError> {
    let logs = state.manager.read().await.get(&id).map(|p| p.logs.join("\n"));
    match logs {
        Some(logs) if logs.is_empty() => Ok(Json(LogsResponse { logs: "No logs available".to_string() })),
        Some(logs) => Ok(Json(LogsResponse { logs })),
        None => Err(ApiError::NotFound(id)),
    }
}

/// GET /api/forcefields
pub async fn list_forcefields() -> Json<&'static [ForceField]> {
    Json(FORCEFIELDS)
}

/// GET /api/stats
pub async fn project_stats(State(state): State<SharedState>) -> Json<ProjectStats> {
    let stats = state.manager.read().await.stats();
    Json(stats)
}

/// GET /api/session - current selection and view
pub async fn session(State(state): State<SharedState>) -> Json<SessionResponse> {
    let manager = state.manager.read().await;
    Json(SessionResponse {
        selected: manager.selected_id().map(str::to_string),
        view: manager.current_view(),
    })
}

/// GET /api/connectivity
pub async fn connectivity(State(state): State<SharedState>) -> Json<ConnectivityState> {
    Json(state.connectivity())
}
