//! gmxgui-projects: the project state machine behind the dashboard.
//!
//! Holds the ordered project list, the current selection and view, and the
//! timer-driven runner that moves a started project to `completed`.

pub mod project;
pub mod view;
pub mod manager;
pub mod runner;

pub use project::{FileRecord, Project, ProjectStatus, SimulationParams};
pub use view::{route_for, View};
pub use manager::{Confirm, DeleteOutcome, ProjectManager, ProjectStats, SharedManager};
pub use runner::{SimulationRunner, StatusChange};
