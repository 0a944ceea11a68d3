//! Project lifecycle controller.
//!
//! Owns the ordered project list (newest first), the current selection and
//! the current view. Every operation is total: unknown ids leave the state
//! untouched and return `None`.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::project::{FileRecord, Project, ProjectStatus, SimulationParams};
use crate::view::{route_for, View};

pub type SharedManager = Arc<RwLock<ProjectManager>>;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this project?";

/// Confirmation prompt consulted before a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    NotFound,
}

/// Per-status counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: usize,
    pub created: usize,
    pub configured: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct ProjectManager {
    projects: Vec<Project>,
    selected: Option<String>,
    view: View,
}

impl ProjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager pre-populated with one finished and one fresh example project.
    pub fn with_demo_projects() -> Self {
        let seeded = NaiveDate::from_ymd_opt(2025, 6, 26).unwrap_or_default();

        let mut finished = Project::new("Example Protein Study");
        finished.description = "Lysozyme in water".to_string();
        finished.created = seeded;
        finished.status = ProjectStatus::Completed;
        finished.files = vec![
            FileRecord::new("protein.pdb", ".pdb", 125_000, seeded),
            FileRecord::new("topology.top", ".top", 15_000, seeded),
        ];
        finished.forcefield = Some("amber99sb-ildn".to_string());
        finished.config = Some(SimulationParams::with_forcefield("amber99sb-ildn"));

        let mut fresh = Project::new("Ligand Binding Analysis");
        fresh.created = seeded;

        Self {
            projects: vec![finished, fresh],
            selected: None,
            view: View::Dashboard,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn current_view(&self) -> View {
        self.view
    }

    /// Create a project at the head of the list, select it and jump to the upload view.
    /// Without a name it is called `Project N`, N being the new list length.
    pub fn create(&mut self, name: Option<String>) -> &Project {
        self.create_with_description(name, None)
    }

    pub fn create_with_description(&mut self, name: Option<String>, description: Option<String>) -> &Project {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Project {}", self.projects.len() + 1));
        let mut project = Project::new(name);
        project.description = description.map(|d| d.trim().to_string()).unwrap_or_default();
        info!(project_id = %project.id, name = %project.name, "Project created");

        self.selected = Some(project.id.clone());
        self.view = View::Upload;
        self.projects.insert(0, project);
        &self.projects[0]
    }

    /// Remove a project once the prompt agrees. Deleting the selected project
    /// clears the selection and returns to the dashboard.
    pub fn delete<C: Confirm>(&mut self, id: &str, mut confirm: C) -> DeleteOutcome {
        let Some(index) = self.projects.iter().position(|p| p.id == id) else {
            return DeleteOutcome::NotFound;
        };
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(project_id = %id, "Deletion declined");
            return DeleteOutcome::Declined;
        }

        let removed = self.projects.remove(index);
        info!(project_id = %removed.id, name = %removed.name, "Project deleted");
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.view = View::Dashboard;
        }
        DeleteOutcome::Deleted
    }

    /// Select a project and route to the view its state calls for.
    pub fn select(&mut self, id: &str) -> Option<View> {
        let view = route_for(Some(self.get(id)?));
        self.selected = Some(id.to_string());
        self.view = view;
        Some(view)
    }

    /// Navigate. Project views fall back to the dashboard when nothing is selected.
    pub fn set_view(&mut self, view: View) -> View {
        self.view = if view.needs_project() && self.selected_project().is_none() {
            View::Dashboard
        } else {
            view
        };
        self.view
    }

    pub fn attach_file(&mut self, id: &str, file: FileRecord) -> Option<&Project> {
        let project = self.get_mut(id)?;
        debug!(project_id = %id, file = %file.name, size = file.size, "File attached");
        project.files.push(file);
        Some(&*project)
    }

    /// Pick a force field; the project becomes `configured`.
    /// Ignored while the project is running.
    pub fn select_forcefield(&mut self, id: &str, forcefield: &str) -> Option<&Project> {
        let project = self.get_mut(id)?;
        if !project.status.can_transition_to(ProjectStatus::Configured) {
            debug!(project_id = %id, status = %project.status, "Force field change ignored");
            return Some(&*project);
        }

        project.forcefield = Some(forcefield.to_string());
        if let Some(config) = project.config.as_mut() {
            config.forcefield = forcefield.to_string();
        }
        project.status = ProjectStatus::Configured;
        Some(&*project)
    }

    /// Store a full parameter set. Adopts its force field; the project becomes `configured`.
    pub fn configure(&mut self, id: &str, params: SimulationParams) -> Option<&Project> {
        let project = self.get_mut(id)?;
        if !project.status.can_transition_to(ProjectStatus::Configured) {
            debug!(project_id = %id, status = %project.status, "Configuration ignored");
            return Some(&*project);
        }

        project.forcefield = Some(params.forcefield.clone());
        project.config = Some(params);
        project.status = ProjectStatus::Configured;
        Some(&*project)
    }

    /// Mark the project `running`. Requires a force field; ignored while already running.
    pub fn start(&mut self, id: &str) -> Option<&Project> {
        let project = self.get_mut(id)?;
        if project.forcefield.is_none() || !project.status.can_transition_to(ProjectStatus::Running) {
            debug!(project_id = %id, status = %project.status, "Start ignored");
            return Some(&*project);
        }

        project.status = ProjectStatus::Running;
        project.logs.clear();
        project.log(format!("Starting simulation for project {id}"));
        project.log("Generating topology...");
        info!(project_id = %id, "Simulation started");
        Some(&*project)
    }

    /// Completion signal for a running project.
    pub fn complete(&mut self, id: &str) -> Option<&Project> {
        let project = self.get_mut(id)?;
        if project.status.can_transition_to(ProjectStatus::Completed) {
            project.status = ProjectStatus::Completed;
            project.log(format!("Simulation completed for project {id}"));
            info!(project_id = %id, "Simulation completed");
        }
        Some(&*project)
    }

    /// Failure signal for a running project.
    pub fn fail(&mut self, id: &str, reason: &str) -> Option<&Project> {
        let project = self.get_mut(id)?;
        if project.status.can_transition_to(ProjectStatus::Failed) {
            project.status = ProjectStatus::Failed;
            project.log(format!("Simulation failed: {reason}"));
            warn!(project_id = %id, reason, "Simulation failed");
        }
        Some(&*project)
    }

    pub fn count_by_status(&self, status: ProjectStatus) -> usize {
        self.projects.iter().filter(|p| p.status == status).count()
    }

    pub fn stats(&self) -> ProjectStats {
        ProjectStats {
            total: self.projects.len(),
            created: self.count_by_status(ProjectStatus::Created),
            configured: self.count_by_status(ProjectStatus::Configured),
            running: self.count_by_status(ProjectStatus::Running),
            completed: self.count_by_status(ProjectStatus::Completed),
            failed: self.count_by_status(ProjectStatus::Failed),
        }
    }
}
