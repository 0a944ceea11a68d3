//! File upload view. Uploads are mock records; no bytes ever reach the server.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form,
};
use serde::Deserialize;

use gmxgui_common::formats::{FileKind, SUPPORTED_EXTENSIONS};
use gmxgui_projects::{FileRecord, Project};

use crate::handlers::layout::escape_html;
use crate::state::{AppEvent, SharedState};

/// Preset buttons on the upload card: (file name, type tag, button label).
const PRESETS: &[(&str, &str, &str)] = &[
    ("protein.pdb", ".pdb", "+ Add PDB File"),
    ("ligand.mol2", ".mol2", "+ Add Ligand"),
    ("topology.top", ".top", "+ Add Topology"),
];

#[derive(Deserialize)]
pub struct UploadForm {
    pub name: String,
    pub file_type: Option<String>,
}

/// POST /projects/{id}/files
pub async fn upload_file(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<UploadForm>,
) -> Redirect {
    let file = FileRecord::fabricate(form.name, form.file_type.unwrap_or_default());
    let file_name = file.name.clone();

    let attached = state.manager.write().await.attach_file(&id, file).is_some();
    if attached {
        state.emit(AppEvent::FileAttached { project_id: id, file_name });
    }
    Redirect::to("/")
}

pub fn render(project: &Project) -> String {
    let id = escape_html(&project.id);

    let presets: String = PRESETS.iter().map(|(name, tag, label)| {
        format!(r#"
            <form method="post" action="/projects/{}/files" class="inline">
                <input type="hidden" name="name" value="{}">
                <input type="hidden" name="file_type" value="{}">
                <button type="submit" class="btn btn-sm">{}</button>
            </form>"#, id, name, tag, label)
    }).collect();

    let file_list = if project.files.is_empty() {
        String::new()
    } else {
        let items: String = project.files.iter().map(|f| {
            let kind = FileKind::from_type_tag(&f.file_type);
            format!(r#"
            <div class="file-item">
                <div class="d-flex align-center gap-3">
                    <div class="file-icon">{}</div>
                    <div>
                        <div class="font-bold">{}</div>
                        <div class="small text-muted">{} • {:.1} KB • {}</div>
                    </div>
                </div>
                <span class="file-type-badge">{}</span>
            </div>"#,
                kind.icon(),
                escape_html(&f.name),
                escape_html(&f.file_type),
                f.size_kb(),
                f.uploaded_at,
                escape_html(&f.file_type),
            )
        }).collect();

        format!(r#"
        <div class="card">
            <div class="card-header">Uploaded Files ({})</div>
            {}
            <div class="text-center mt-3">
                <form method="post" action="/view/configure" class="inline">
                    <button type="submit" class="btn btn-primary">⚙️ Configure System →</button>
                </form>
            </div>
        </div>"#, project.files.len(), items)
    };

    format!(r#"
    <h2 class="page-title">📁 File Upload - {}</h2>
    <div class="card mb-4">
        <div class="card-header">Upload Files</div>
        <div class="upload-box text-center">
            <div class="upload-icon">📁</div>
            <h4>Add a structure, ligand or topology file</h4>
            <p class="text-muted">Supported formats: {}</p>
            <div class="d-flex gap-3 justify-center">{}</div>
            <form method="post" action="/projects/{}/files" class="mt-3">
                <input type="text" name="name" placeholder="custom.gro" class="parameter-input" required>
                <button type="submit" class="btn btn-sm">+ Add File</button>
            </form>
        </div>
    </div>
    {}"#,
        escape_html(&project.name),
        SUPPORTED_EXTENSIONS.join(", "),
        presets,
        id,
        file_list,
    )
}
