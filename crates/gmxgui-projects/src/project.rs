//! Project data model: projects, attached file records, and simulation parameters.

use chrono::{Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use gmxgui_common::formats::type_tag_for;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Created,
    Configured,
    Running,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Created    => "created",
            ProjectStatus::Configured => "configured",
            ProjectStatus::Running    => "running",
            ProjectStatus::Completed  => "completed",
            ProjectStatus::Failed     => "failed",
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// Forward path is created → configured → running → completed | failed.
    /// Finished projects may be reconfigured or re-run; a running project only
    /// leaves `running` through a completion or failure signal.
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, next),
            (Created, Configured)
                | (Configured, Configured)
                | (Configured, Running)
                | (Running, Completed)
                | (Running, Failed)
                | (Completed, Configured)
                | (Completed, Running)
                | (Failed, Configured)
                | (Failed, Running)
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file attached to a project. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    /// Extension tag including the dot, e.g. `.pdb`.
    pub file_type: String,
    pub size: u64,
    pub uploaded_at: NaiveDate,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, file_type: impl Into<String>, size: u64, uploaded_at: NaiveDate) -> Self {
        Self {
            name: name.into(),
            file_type: file_type.into(),
            size,
            uploaded_at,
        }
    }

    /// Build a mock upload: random size between 10 000 and 110 000 bytes, stamped today.
    /// An empty `file_type` is derived from the file name.
    pub fn fabricate(name: impl Into<String>, file_type: impl Into<String>) -> Self {
        let name = name.into();
        let mut file_type = file_type.into();
        if file_type.is_empty() {
            file_type = type_tag_for(&name);
        }
        let size = rand::thread_rng().gen_range(10_000..110_000);
        Self::new(name, file_type, size, Local::now().date_naive())
    }

    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

/// Simulation parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Kelvin.
    pub temperature: f64,
    /// Bar.
    pub pressure: f64,
    /// Picoseconds.
    pub time_step: f64,
    /// Nanoseconds.
    pub total_time: f64,
    pub forcefield: String,
    #[serde(default = "default_gpu_enabled")]
    pub gpu_enabled: bool,
    /// OpenMP threads per rank.
    #[serde(default = "default_ntomp")]
    pub ntomp: u32,
    /// Thread-MPI ranks.
    #[serde(default = "default_ntmpi")]
    pub ntmpi: u32,
}

fn default_gpu_enabled() -> bool { true }
fn default_ntomp()       -> u32  { 4 }
fn default_ntmpi()       -> u32  { 1 }

impl SimulationParams {
    pub fn with_forcefield(forcefield: impl Into<String>) -> Self {
        Self {
            temperature: 300.0,
            pressure: 1.0,
            time_step: 0.002,
            total_time: 10.0,
            forcefield: forcefield.into(),
            gpu_enabled: default_gpu_enabled(),
            ntomp: default_ntomp(),
            ntmpi: default_ntmpi(),
        }
    }

    /// Total CPU threads requested for the run.
    pub fn thread_count(&self) -> u32 {
        self.ntomp.max(1) * self.ntmpi.max(1)
    }

    /// Number of integration steps implied by total time and time step.
    pub fn step_count(&self) -> u64 {
        if self.time_step <= 0.0 {
            return 0;
        }
        // total_time is in ns, time_step in ps
        ((self.total_time * 1000.0) / self.time_step).round() as u64
    }
}

/// The unit of user work: a named container for files, configuration and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    pub created: NaiveDate,
    pub files: Vec<FileRecord>,
    pub forcefield: Option<String>,
    pub config: Option<SimulationParams>,
    /// Log of the most recent run, one line per entry.
    #[serde(default)]
    pub logs: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::Created,
            created: Local::now().date_naive(),
            files: Vec::new(),
            forcefield: None,
            config: None,
            logs: Vec::new(),
        }
    }

    /// Append a timestamped line to the run log.
    pub fn log(&mut self, line: impl AsRef<str>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push(format!("[{stamp}] {}", line.as_ref()));
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn has_structure_file(&self) -> bool {
        self.files.iter().any(|f| f.file_type.eq_ignore_ascii_case(".pdb"))
    }

    /// Parameters in effect: the stored set, or defaults for the selected force field.
    pub fn effective_params(&self) -> Option<SimulationParams> {
        self.config.clone().or_else(|| {
            self.forcefield.as_ref().map(SimulationParams::with_forcefield)
        })
    }
}
