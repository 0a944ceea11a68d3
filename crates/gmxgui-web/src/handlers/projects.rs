//! Project list actions posted from the dashboard and navigation bar.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form,
};
use serde::Deserialize;

use gmxgui_projects::{DeleteOutcome, View};

use crate::state::{AppEvent, SharedState};

#[derive(Deserialize, Default)]
pub struct CreateForm {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct DeleteForm {
    /// Set by the browser once the user accepted the confirm() prompt.
    #[serde(default)]
    pub confirm: bool,
}

/// POST /projects
pub async fn create_project(
    State(state): State<SharedState>,
    Form(form): Form<CreateForm>,
) -> Redirect {
    let (project_id, name) = {
        let mut manager = state.manager.write().await;
        let project = manager.create_with_description(form.name, form.description);
        (project.id.clone(), project.name.clone())
    };
    state.emit(AppEvent::ProjectCreated { project_id, name });
    Redirect::to("/")
}

/// POST /projects/{id}/open
pub async fn open_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Redirect {
    state.manager.write().await.select(&id);
    Redirect::to("/")
}

/// POST /projects/{id}/delete
pub async fn delete_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    let outcome = state.manager.write().await.delete(&id, |_: &str| form.confirm);
    if outcome == DeleteOutcome::Deleted {
        state.emit(AppEvent::ProjectDeleted { project_id: id });
    }
    Redirect::to("/")
}

/// POST /view/{view}
pub async fn switch_view(
    State(state): State<SharedState>,
    Path(view): Path<String>,
) -> Redirect {
    match view.parse::<View>() {
        Ok(view) => {
            state.manager.write().await.set_view(view);
        }
        Err(e) => tracing::debug!("{}", e),
    }
    Redirect::to("/")
}
