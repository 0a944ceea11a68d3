//! Page shell shared by every view: header, navigation, connectivity banner, footer.

use gmxgui_monitoring::{ConnectivityState, ConnectivityStatus};
use gmxgui_projects::{Project, ProjectStats, View};

use crate::state::AppState;

/// Everything a page render needs, copied out of the shared state under one read lock.
pub struct PageContext {
    pub view: View,
    pub selected: Option<Project>,
    pub projects: Vec<Project>,
    pub stats: ProjectStats,
    pub connectivity: ConnectivityState,
    pub api_endpoint: String,
}

impl PageContext {
    pub async fn load(state: &AppState) -> Self {
        let manager = state.manager.read().await;
        Self {
            view: manager.current_view(),
            selected: manager.selected_project().cloned(),
            projects: manager.projects().to_vec(),
            stats: manager.stats(),
            connectivity: state.connectivity(),
            api_endpoint: state.api_endpoint.clone(),
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

pub fn no_project_selected() -> String {
    r#"<div class="card text-center text-muted">No project selected</div>"#.to_string()
}

fn render_nav(ctx: &PageContext) -> String {
    let visible: &[View] = if ctx.selected.is_some() { &View::ALL } else { &[View::Dashboard] };
    let buttons: String = visible.iter().map(|view| {
        let active = if *view == ctx.view { " active" } else { "" };
        format!(r#"
            <form method="post" action="/view/{}" class="inline">
                <button type="submit" class="nav-item{}">{}</button>
            </form>"#, view.as_str(), active, view.label())
    }).collect();

    let current = ctx.selected.as_ref()
        .map(|p| format!(r#"<div class="current-project">Current: {}</div>"#, escape_html(&p.name)))
        .unwrap_or_default();

    format!(r#"<nav class="navigation">
        <div class="nav-items">{}</div>
        {}
    </nav>"#, buttons, current)
}

fn render_banner(ctx: &PageContext) -> String {
    match ctx.connectivity.status {
        ConnectivityStatus::Connected if ctx.view == View::Dashboard => format!(
            r#"<div class="alert alert-success mb-4">
                <strong>✅ Backend Connected!</strong> API is responding at
                <a href="{0}" target="_blank" rel="noopener noreferrer">{0}</a>
            </div>"#,
            escape_html(&ctx.api_endpoint)
        ),
        ConnectivityStatus::Disconnected => format!(
            r#"<div class="alert alert-error mb-4">
                <strong>❌ Backend Disconnected</strong><br>
                {}<br>
                Make sure the backend server is running at {}.
            </div>"#,
            escape_html(&ctx.connectivity.message),
            escape_html(&ctx.api_endpoint)
        ),
        _ => String::new(),
    }
}

/// Wrap a view body in the full HTML document.
pub fn render_page(ctx: &PageContext, body: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} | GROMACS GUI Platform</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
<header class="header">
    <div class="container d-flex justify-between align-center">
        <h1>🧬 GROMACS GUI Platform</h1>
        <div class="d-flex align-center">
            <span class="status-dot status-{}"></span>
            <span class="small">{}</span>
        </div>
    </div>
</header>
{}
<main class="container">
    {}
    {}
</main>
<footer class="footer">
    <div class="container">GROMACS GUI Platform - Molecular Dynamics Made Easy</div>
</footer>
<script>
    new EventSource('/api/events').onmessage = () => location.reload();
</script>
</body>
</html>"#,
        ctx.view.label(),
        ctx.connectivity.status.as_str(),
        ctx.connectivity.status.label(),
        render_nav(ctx),
        render_banner(ctx),
        body,
    )
}
