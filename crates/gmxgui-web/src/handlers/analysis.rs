//! Analysis results view. Values are placeholders until a real trajectory exists.

use gmxgui_projects::{Project, ProjectStatus};

use crate::handlers::layout::escape_html;

const SUMMARY: &[(&str, &str)] = &[
    ("0.18 nm", "Average RMSD"),
    ("-1300 kJ/mol", "Average Energy"),
    ("0.28 nm", "Max RMSF"),
    ("5000", "Frames"),
];

const TOOLS: &[(&str, &str, &str)] = &[
    ("📊", "RMSD Plot", "Root mean square deviation over time"),
    ("⚡", "Energy Analysis", "Potential and kinetic energy plots"),
    ("🌊", "RMSF Analysis", "Root mean square fluctuation per residue"),
    ("🧬", "3D Viewer", "Interactive molecular visualization"),
];

pub fn render(project: &Project) -> String {
    let name = escape_html(&project.name);

    if project.status != ProjectStatus::Completed {
        return format!(r#"
    <h2 class="page-title">📈 Analysis Results - {}</h2>
    <div class="card text-center text-muted p-4">
        <div class="upload-icon">⏳</div>
        <h3>Analysis Not Available</h3>
        <p>Complete the simulation to view analysis results.</p>
    </div>"#, name);
    }

    let summary: String = SUMMARY.iter().map(|(value, label)| format!(
        r#"<div class="analysis-card"><div class="analysis-value">{}</div><div class="analysis-label">{}</div></div>"#,
        value, label
    )).collect();

    let tools: String = TOOLS.iter().map(|(icon, title, detail)| format!(
        r#"<button class="tool-card" disabled><div class="tool-icon">{}</div><div class="font-bold">{}</div><div class="small text-muted">{}</div></button>"#,
        icon, title, detail
    )).collect();

    format!(r#"
    <h2 class="page-title">📈 Analysis Results - {}</h2>
    <div class="card mb-4">
        <div class="card-header">Analysis Summary</div>
        <div class="analysis-grid">{}</div>
    </div>
    <div class="card">
        <div class="card-header">Analysis Tools</div>
        <div class="tools-grid">{}</div>
    </div>"#, name, summary, tools)
}
