//! Simulation control view.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use gmxgui_common::forcefield;
use gmxgui_projects::{Project, ProjectStatus};

use crate::handlers::layout::escape_html;
use crate::state::SharedState;

/// POST /projects/{id}/start
/// The runner broadcasts the status changes itself.
pub async fn start_simulation(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Redirect {
    state.runner.start(&id).await;
    Redirect::to("/")
}

fn status_line(status: ProjectStatus) -> (&'static str, &'static str) {
    match status {
        ProjectStatus::Running   => ("🔄", "Simulation in progress..."),
        ProjectStatus::Completed => ("✅", "Simulation completed successfully"),
        ProjectStatus::Failed    => ("❌", "Simulation failed - check logs"),
        _                        => ("⏸️", "Ready to start simulation"),
    }
}

pub fn render(project: &Project) -> String {
    let id = escape_html(&project.id);
    let (icon, detail) = status_line(project.status);
    let running = project.status == ProjectStatus::Running;

    let progress = if running {
        r#"<div class="progress-track"><div class="progress-bar indeterminate"></div></div>"#
    } else {
        ""
    };

    let params = project.effective_params();
    let forcefield_label = project.forcefield.as_deref()
        .map(|ff| escape_html(forcefield::label_for(ff)))
        .unwrap_or_else(|| "Not selected".to_string());
    let temperature = params.as_ref().map(|p| format!("{} K", p.temperature)).unwrap_or_else(|| "-".into());
    let pressure = params.as_ref().map(|p| format!("{} bar", p.pressure)).unwrap_or_else(|| "-".into());
    let steps = params.as_ref().map(|p| p.step_count().to_string()).unwrap_or_else(|| "-".into());
    let resources = params.as_ref()
        .map(|p| format!(
            "{} ({} threads: {} OpenMP x {} MPI)",
            if p.gpu_enabled { "GPU" } else { "CPU only" },
            p.thread_count(), p.ntomp, p.ntmpi,
        ))
        .unwrap_or_else(|| "-".into());

    let log = if project.logs.is_empty() {
        r#"<p class="text-muted">No logs available</p>"#.to_string()
    } else {
        let lines: Vec<String> = project.logs.iter().map(|l| escape_html(l)).collect();
        format!(r#"<pre class="log-box">{}</pre>"#, lines.join("\n"))
    };

    let results = if project.status == ProjectStatus::Completed {
        r#"<div class="text-center mt-3">
            <form method="post" action="/view/analysis" class="inline">
                <button type="submit" class="btn btn-primary">📈 View Results →</button>
            </form>
        </div>"#
    } else {
        ""
    };

    format!(r#"
    <h2 class="page-title">▶️ Simulation Control - {}</h2>
    <div class="card mb-4">
        <div class="card-header">Simulation Status</div>
        <div class="simulation-status d-flex align-center gap-3">
            <div class="status-icon">{}</div>
            <div>
                <div class="font-bold">Status: {}</div>
                <div class="text-muted">{}</div>
            </div>
        </div>
        {}
    </div>
    <div class="card mb-4">
        <div class="card-header">Control Panel</div>
        <div class="control-buttons d-flex gap-3">
            <form method="post" action="/projects/{}/start" class="inline">
                <button type="submit" class="btn btn-primary"{}>▶️ Start Simulation</button>
            </form>
            <button class="btn" disabled>⏸️ Pause</button>
            <button class="btn btn-danger" disabled>⏹️ Stop</button>
        </div>
    </div>
    <div class="card">
        <div class="card-header">System Information</div>
        <div class="info-grid">
            <div class="info-item"><strong>Force Field:</strong> {}</div>
            <div class="info-item"><strong>Files:</strong> {}</div>
            <div class="info-item"><strong>Temperature:</strong> {}</div>
            <div class="info-item"><strong>Pressure:</strong> {}</div>
            <div class="info-item"><strong>Steps:</strong> {}</div>
            <div class="info-item"><strong>Resources:</strong> {}</div>
        </div>
        {}
    </div>
    <div class="card mt-3">
        <div class="card-header">Run Log</div>
        {}
    </div>"#,
        escape_html(&project.name),
        icon,
        project.status.as_str().to_uppercase(),
        detail,
        progress,
        id,
        if running || project.forcefield.is_none() { " disabled" } else { "" },
        forcefield_label,
        project.files.len(),
        temperature,
        pressure,
        steps,
        resources,
        results,
        log,
    )
}
