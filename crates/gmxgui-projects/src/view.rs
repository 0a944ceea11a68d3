//! View routing: which screen to show for the selected project.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::project::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Dashboard,
    Upload,
    Configure,
    Simulation,
    Analysis,
}

impl View {
    pub const ALL: [View; 5] = [View::Dashboard, View::Upload, View::Configure, View::Simulation, View::Analysis];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Dashboard  => "dashboard",
            View::Upload     => "upload",
            View::Configure  => "configure",
            View::Simulation => "simulation",
            View::Analysis   => "analysis",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Dashboard  => "📊 Dashboard",
            View::Upload     => "📁 File Upload",
            View::Configure  => "⚙️ Configure",
            View::Simulation => "▶️ Simulation",
            View::Analysis   => "📈 Analysis",
        }
    }

    /// Views other than the dashboard operate on a selected project.
    pub fn needs_project(self) -> bool {
        self != View::Dashboard
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown view: {s}"))
    }
}

/// Pure routing policy: no selection → dashboard, no files → upload,
/// files but no force field → configure, otherwise → simulation.
pub fn route_for(project: Option<&Project>) -> View {
    match project {
        None => View::Dashboard,
        Some(p) if !p.has_files() => View::Upload,
        Some(p) if p.forcefield.is_none() => View::Configure,
        Some(_) => View::Simulation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::FileRecord;
    use chrono::NaiveDate;

    fn file() -> FileRecord {
        FileRecord::new("protein.pdb", ".pdb", 125_000, NaiveDate::from_ymd_opt(2025, 6, 26).unwrap())
    }

    #[test]
    fn test_no_files_routes_to_upload() {
        let p = Project::new("empty");
        assert_eq!(route_for(Some(&p)), View::Upload);
    }

    #[test]
    fn test_forcefield_without_files_still_routes_to_upload() {
        let mut p = Project::new("ff only");
        p.forcefield = Some("oplsaa".into());
        assert_eq!(route_for(Some(&p)), View::Upload);
    }

    #[test]
    fn test_files_without_forcefield_routes_to_configure() {
        let mut p = Project::new("files");
        p.files.push(file());
        assert_eq!(route_for(Some(&p)), View::Configure);
    }

    #[test]
    fn test_files_and_forcefield_routes_to_simulation() {
        let mut p = Project::new("ready");
        p.files.push(file());
        p.forcefield = Some("amber99sb-ildn".into());
        assert_eq!(route_for(Some(&p)), View::Simulation);
    }

    #[test]
    fn test_no_selection_routes_to_dashboard() {
        assert_eq!(route_for(None), View::Dashboard);
    }

    #[test]
    fn test_view_parse() {
        assert_eq!("analysis".parse::<View>(), Ok(View::Analysis));
        assert!("settings".parse::<View>().is_err());
    }
}
