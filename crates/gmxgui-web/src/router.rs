//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::path::Path;
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    api,
    dashboard::index,
    projects::{create_project, open_project, delete_project, switch_view},
    upload::upload_file,
    configure::{select_forcefield, configure_params},
    simulation::start_simulation,
    system::health,
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages and form actions
        .route("/",                        get(index))
        .route("/projects",                post(create_project))
        .route("/projects/{id}/open",      post(open_project))
        .route("/projects/{id}/delete",    post(delete_project))
        .route("/projects/{id}/files",     post(upload_file))
        .route("/projects/{id}/forcefield", post(select_forcefield))
        .route("/projects/{id}/configure", post(configure_params))
        .route("/projects/{id}/start",     post(start_simulation))
        .route("/view/{view}",             post(switch_view))
        .route("/health",                  get(health))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/projects",                  get(api::list_projects).post(api::create_project))
        .route("/api/projects/{id}",             get(api::get_project).delete(api::delete_project))
        .route("/api/projects/{id}/files",       post(api::attach_file))
        .route("/api/projects/{id}/forcefield",  post(api::select_forcefield))
        .route("/api/projects/{id}/configure",   post(api::configure_project))
        .route("/api/projects/{id}/start",       post(api::start_project))
        .route("/api/projects/{id}/logs",        get(api::project_logs))
        .route("/api/forcefields",               get(api::list_forcefields))
        .route("/api/stats",                     get(api::project_stats))
        .route("/api/session",                   get(api::session))
        .route("/api/connectivity",              get(api::connectivity))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use gmxgui_monitoring::ConnectivityState;
    use gmxgui_projects::ProjectManager;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::sync::watch;
    use tower::ServiceExt;

    fn app() -> Router {
        let (_tx, rx) = watch::channel(ConnectivityState::checking());
        let state = AppState::new(ProjectManager::new(), Duration::from_secs(5), rx, "http://localhost:8000/");
        build_router(state, "static")
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn send_form(app: &Router, uri: &str, form: &str) -> StatusCode {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "GROMACS GUI API is running");
    }

    #[tokio::test]
    async fn test_project_workflow_over_api() {
        let app = app();

        let (status, created) = send(&app, Method::POST, "/api/projects", Some(json!({ "name": "Lysozyme" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "created");
        let id = created["id"].as_str().unwrap().to_string();

        let (_, session) = send(&app, Method::GET, "/api/session", None).await;
        assert_eq!(session["view"], "upload");
        assert_eq!(session["selected"], id.as_str());

        let (status, with_file) = send(&app, Method::POST, &format!("/api/projects/{id}/files"),
            Some(json!({ "name": "1aki.pdb", "size": 1024 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(with_file["files"][0]["file_type"], ".pdb");
        assert_eq!(with_file["files"][0]["size"], 1024);

        let (_, configured) = send(&app, Method::POST, &format!("/api/projects/{id}/forcefield"),
            Some(json!({ "forcefield": "oplsaa" }))).await;
        assert_eq!(configured["status"], "configured");

        let (_, started) = send(&app, Method::POST, &format!("/api/projects/{id}/start"), None).await;
        assert_eq!(started["started"], true);
        assert_eq!(started["project"]["status"], "running");

        let (_, stats) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(stats["running"], 1);
        assert_eq!(stats["total"], 1);
    }

    #[tokio::test]
    async fn test_unknown_forcefield_rejected() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/projects", Some(json!({}))).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::POST, &format!("/api/projects/{id}/forcefield"),
            Some(json!({ "forcefield": "martini" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("martini"));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/projects", Some(json!({}))).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, Method::DELETE, &format!("/api/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/projects/{id}?confirm=true"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::GET, &format!("/api/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, session) = send(&app, Method::GET, "/api/session", None).await;
        assert_eq!(session["view"], "dashboard");
        assert_eq!(session["selected"], Value::Null);
    }

    #[tokio::test]
    async fn test_form_actions_redirect_and_render() {
        let app = app();
        assert_eq!(send_form(&app, "/projects", "name=Membrane+patch").await, StatusCode::SEE_OTHER);

        let (_, projects) = send(&app, Method::GET, "/api/projects", None).await;
        let id = projects[0]["id"].as_str().unwrap().to_string();
        assert_eq!(projects[0]["name"], "Membrane patch");

        send_form(&app, &format!("/projects/{id}/files"), "name=protein.pdb&file_type=.pdb").await;
        send_form(&app, &format!("/projects/{id}/open"), "").await;
        let (_, session) = send(&app, Method::GET, "/api/session", None).await;
        assert_eq!(session["view"], "configure");

        let response = app.clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = String::from_utf8(to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
        assert!(html.contains("System Configuration - Membrane patch"));

        // declined browser prompt posts no confirm field
        send_form(&app, &format!("/projects/{id}/delete"), "").await;
        let (_, projects) = send(&app, Method::GET, "/api/projects", None).await;
        assert_eq!(projects.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_without_body_uses_default_name() {
        let app = app();
        let (status, created) = send(&app, Method::POST, "/api/projects", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Project 1");
        assert_eq!(created["description"], "");

        let (status, described) = send(&app, Method::POST, "/api/projects",
            Some(json!({ "name": "Barnase", "description": "Barstar complex" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(described["description"], "Barstar complex");
    }

    #[tokio::test]
    async fn test_run_logs_endpoint() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/projects", None).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, logs) = send(&app, Method::GET, &format!("/api/projects/{id}/logs"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(logs["logs"], "No logs available");

        send(&app, Method::POST, &format!("/api/projects/{id}/configure"),
            Some(json!({ "forcefield": "amber14sb", "ntomp": 8, "gpu_enabled": false }))).await;
        send(&app, Method::POST, &format!("/api/projects/{id}/start"), None).await;

        let (_, logs) = send(&app, Method::GET, &format!("/api/projects/{id}/logs"), None).await;
        let text = logs["logs"].as_str().unwrap();
        assert!(text.contains(&format!("Starting simulation for project {id}")));
        assert!(text.contains("Generating topology..."));

        let (_, project) = send(&app, Method::GET, &format!("/api/projects/{id}"), None).await;
        assert_eq!(project["config"]["ntomp"], 8);
        assert_eq!(project["config"]["gpu_enabled"], false);

        let (status, _) = send(&app, Method::GET, "/api/projects/missing/logs", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_event_stream_content_type() {
        let response = app()
            .oneshot(Request::builder().uri("/api/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/event-stream"), "got {content_type}");
    }

    #[tokio::test]
    async fn test_blank_parameter_form_is_accepted() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/projects", None).await;
        let id = created["id"].as_str().unwrap().to_string();
        send_form(&app, &format!("/projects/{id}/forcefield"), "forcefield=oplsaa").await;

        let status = send_form(&app, &format!("/projects/{id}/configure"),
            "temperature=&pressure=1.5&time_step=0.002&total_time=20&ntomp=2&ntmpi=1").await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (_, project) = send(&app, Method::GET, &format!("/api/projects/{id}"), None).await;
        assert_eq!(project["config"]["temperature"], 300.0);
        assert_eq!(project["config"]["pressure"], 1.5);
        assert_eq!(project["config"]["gpu_enabled"], false);
    }

    #[tokio::test]
    async fn test_connectivity_endpoint_reports_initial_state() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/connectivity", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "checking");
    }
}
