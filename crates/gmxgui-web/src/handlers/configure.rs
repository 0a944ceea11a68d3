//! System configuration view: force field selection and simulation parameters.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form,
};
use serde::Deserialize;

use gmxgui_common::forcefield::{self, FORCEFIELDS};
use gmxgui_projects::{Project, SimulationParams};

use crate::handlers::layout::escape_html;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ForceFieldForm {
    pub forcefield: String,
}

/// Raw form fields. Browsers post emptied number inputs as empty strings,
/// so values are parsed leniently against the current parameter set.
#[derive(Deserialize, Default)]
pub struct ParamsForm {
    pub temperature: Option<String>,
    pub pressure: Option<String>,
    pub time_step: Option<String>,
    pub total_time: Option<String>,
    /// Checkbox: present only when ticked.
    pub gpu_enabled: Option<String>,
    pub ntomp: Option<String>,
    pub ntmpi: Option<String>,
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, fallback: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
}

fn positive_or(raw: Option<&str>, fallback: f64) -> f64 {
    let value = parse_or(raw, fallback);
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

impl ParamsForm {
    /// Merge onto `current`; blank or invalid fields keep their current value.
    pub fn apply(&self, current: SimulationParams) -> SimulationParams {
        SimulationParams {
            temperature: positive_or(self.temperature.as_deref(), current.temperature),
            pressure: positive_or(self.pressure.as_deref(), current.pressure),
            time_step: positive_or(self.time_step.as_deref(), current.time_step),
            total_time: positive_or(self.total_time.as_deref(), current.total_time),
            gpu_enabled: self.gpu_enabled.is_some(),
            ntomp: parse_or(self.ntomp.as_deref(), current.ntomp).max(1),
            ntmpi: parse_or(self.ntmpi.as_deref(), current.ntmpi).max(1),
            ..current
        }
    }
}

/// POST /projects/{id}/forcefield
pub async fn select_forcefield(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<ForceFieldForm>,
) -> Redirect {
    if forcefield::find(&form.forcefield).is_none() {
        tracing::debug!(forcefield = %form.forcefield, "Ignoring force field outside the catalog");
        return Redirect::to("/");
    }

    state.update_project(&id, |m| m.select_forcefield(&id, &form.forcefield)).await;
    Redirect::to("/")
}

/// POST /projects/{id}/configure
/// Store parameters for the already selected force field.
pub async fn configure_params(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<ParamsForm>,
) -> Redirect {
    let current = state.manager.read().await.get(&id).and_then(|p| p.effective_params());
    let Some(current) = current else {
        return Redirect::to("/");
    };

    let params = form.apply(current);
    state.update_project(&id, |m| m.configure(&id, params)).await;
    Redirect::to("/")
}

fn check(ok: bool) -> &'static str {
    if ok { "✅" } else { "❌" }
}

pub fn render(project: &Project) -> String {
    let id = escape_html(&project.id);
    let selected = project.forcefield.as_deref();

    let cards: String = FORCEFIELDS.iter().map(|ff| {
        let is_selected = selected == Some(ff.id);
        format!(r#"
            <form method="post" action="/projects/{}/forcefield" class="forcefield-card{}">
                <input type="hidden" name="forcefield" value="{}">
                <button type="submit" class="forcefield-button">
                    <div class="font-bold">{}</div>
                    <div class="small text-muted">{}</div>
                    {}
                </button>
            </form>"#,
            id,
            if is_selected { " selected" } else { "" },
            ff.id,
            ff.label,
            ff.description,
            if is_selected { r#"<div class="text-success small">✅ Selected</div>"# } else { "" },
        )
    }).collect();

    let params = project.effective_params()
        .unwrap_or_else(|| SimulationParams::with_forcefield(""));
    let params_form = if selected.is_some() {
        format!(r#"
        <form method="post" action="/projects/{}/configure" class="parameter-grid">
            <label class="parameter-item">Temperature (K)<input type="number" name="temperature" value="{}" step="any" class="parameter-input"></label>
            <label class="parameter-item">Pressure (bar)<input type="number" name="pressure" value="{}" step="0.1" class="parameter-input"></label>
            <label class="parameter-item">Time Step (ps)<input type="number" name="time_step" value="{}" step="0.001" class="parameter-input"></label>
            <label class="parameter-item">Total Time (ns)<input type="number" name="total_time" value="{}" step="any" class="parameter-input"></label>
            <label class="parameter-item">OpenMP Threads<input type="number" name="ntomp" value="{}" min="1" class="parameter-input"></label>
            <label class="parameter-item">MPI Ranks<input type="number" name="ntmpi" value="{}" min="1" class="parameter-input"></label>
            <label class="parameter-item"><span><input type="checkbox" name="gpu_enabled"{}> GPU acceleration</span></label>
            <button type="submit" class="btn btn-sm">Save Parameters</button>
        </form>"#,
            id, params.temperature, params.pressure, params.time_step, params.total_time,
            params.ntomp, params.ntmpi, if params.gpu_enabled { " checked" } else { "" })
    } else {
        r#"<p class="text-muted">Select a force field to edit simulation parameters.</p>"#.to_string()
    };

    let ready = project.has_files() && selected.is_some();
    let proceed = if ready {
        r#"<div class="text-center mt-3">
            <form method="post" action="/view/simulation" class="inline">
                <button type="submit" class="btn btn-primary">▶️ Start Simulation →</button>
            </form>
        </div>"#
    } else {
        ""
    };

    format!(r#"
    <h2 class="page-title">⚙️ System Configuration - {}</h2>
    <div class="card mb-4">
        <div class="card-header">Force Field Selection</div>
        <p class="text-muted">Choose the appropriate force field for your molecular system:</p>
        <div class="forcefield-grid">{}</div>
    </div>
    <div class="card mb-4">
        <div class="card-header">Simulation Parameters</div>
        {}
    </div>
    <div class="card">
        <div class="card-header">System Validation</div>
        <div class="validation-grid">
            <div class="validation-item">{} Protein structure file</div>
            <div class="validation-item">{} Force field selected</div>
            <div class="validation-item">✅ Parameter validation</div>
        </div>
        {}
    </div>"#,
        escape_html(&project.name),
        cards,
        params_form,
        check(project.has_structure_file()),
        check(selected.is_some()),
        proceed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_forcefield_is_marked() {
        let mut p = Project::new("Configured");
        p.forcefield = Some("oplsaa".into());
        let html = render(&p);
        assert_eq!(html.matches("✅ Selected").count(), 1);
        assert!(html.contains("Save Parameters"));
    }

    #[test]
    fn test_blank_fields_keep_current_values() {
        let current = SimulationParams { temperature: 310.0, ..SimulationParams::with_forcefield("oplsaa") };
        let form = ParamsForm {
            temperature: Some(String::new()),
            pressure: Some("2.5".into()),
            time_step: Some("-1".into()),
            total_time: Some("abc".into()),
            gpu_enabled: None,
            ntomp: Some("8".into()),
            ntmpi: Some("0".into()),
        };
        let params = form.apply(current);
        assert_eq!(params.temperature, 310.0);
        assert_eq!(params.pressure, 2.5);
        assert_eq!(params.time_step, 0.002);
        assert_eq!(params.total_time, 10.0);
        assert!(!params.gpu_enabled);
        assert_eq!((params.ntomp, params.ntmpi), (8, 1));
        assert_eq!(params.forcefield, "oplsaa");
    }

    #[test]
    fn test_no_forcefield_hides_parameters() {
        let html = render(&Project::new("Bare"));
        assert!(!html.contains("Save Parameters"));
        assert!(!html.contains("Start Simulation"));
    }
}
