//! Dashboard handler: landing page and dispatch to the current view.

use axum::{extract::State, response::Html};
use gmxgui_projects::View;

use crate::handlers::layout::{escape_html, no_project_selected, render_page, PageContext};
use crate::handlers::{analysis, configure, simulation, upload};
use crate::state::SharedState;

/// GET /
/// Render whichever view the session is on.
pub async fn index(State(state): State<SharedState>) -> Html<String> {
    let ctx = PageContext::load(&state).await;

    let body = match (ctx.view, ctx.selected.as_ref()) {
        (View::Dashboard, _)          => render_dashboard(&ctx),
        (View::Upload, Some(p))       => upload::render(p),
        (View::Configure, Some(p))    => configure::render(p),
        (View::Simulation, Some(p))   => simulation::render(p),
        (View::Analysis, Some(p))     => analysis::render(p),
        (_, None)                     => no_project_selected(),
    };

    Html(render_page(&ctx, &body))
}

fn render_dashboard(ctx: &PageContext) -> String {
    let rows: String = if ctx.projects.is_empty() {
        r#"<div class="text-center text-muted p-4">No projects yet. Create your first project to get started!</div>"#.to_string()
    } else {
        ctx.projects.iter().map(|p| {
            format!(r#"
            <div class="project-item">
                <div>
                    <div class="font-bold">{name}</div>
                    {description}
                    <div class="small text-muted">Created: {created} • Files: {files} • ID: {id}</div>
                </div>
                <div class="d-flex align-center gap-3">
                    <span class="status-badge status-{status}">{status_upper}</span>
                    <form method="post" action="/projects/{id}/open" class="inline">
                        <button type="submit" class="btn btn-sm">📂 Open</button>
                    </form>
                    <form method="post" action="/projects/{id}/delete" class="inline"
                          onsubmit="return confirm('Are you sure you want to delete this project?')">
                        <input type="hidden" name="confirm" value="true">
                        <button type="submit" class="btn btn-sm btn-danger">🗑 Delete</button>
                    </form>
                </div>
            </div>"#,
                name = escape_html(&p.name),
                description = if p.description.is_empty() {
                    String::new()
                } else {
                    format!(r#"<div class="small">{}</div>"#, escape_html(&p.description))
                },
                created = p.created,
                files = p.files.len(),
                id = escape_html(&p.id),
                status = p.status.as_str(),
                status_upper = p.status.as_str().to_uppercase(),
            )
        }).collect()
    };

    format!(r#"
    <div class="text-center mb-4">
        <h2 class="page-title">Molecular Dynamics Simulation Platform</h2>
        <p class="text-muted">A modern web interface for GROMACS simulations</p>
    </div>

    <div class="stats-grid">
        <div class="stat-card"><div class="stat-value" style="color:#3b82f6">{}</div><div class="stat-label">Total Projects</div></div>
        <div class="stat-card"><div class="stat-value" style="color:#10b981">{}</div><div class="stat-label">Completed</div></div>
        <div class="stat-card"><div class="stat-value" style="color:#f59e0b">{}</div><div class="stat-label">Running</div></div>
        <div class="stat-card"><div class="stat-value" style="color:#6b7280">{}</div><div class="stat-label">Ready</div></div>
    </div>

    <div class="text-center mb-4">
        <form method="post" action="/projects" class="inline">
            <input type="text" name="name" placeholder="Project name (optional)" class="parameter-input">
            <input type="text" name="description" placeholder="Description (optional)" class="parameter-input">
            <button type="submit" class="btn btn-primary">➕ Create New Project</button>
        </form>
    </div>

    <div class="card">
        <div class="card-header">Projects ({})</div>
        {}
    </div>"#,
        ctx.stats.total,
        ctx.stats.completed,
        ctx.stats.running,
        ctx.stats.created,
        ctx.stats.total,
        rows,
    )
}
