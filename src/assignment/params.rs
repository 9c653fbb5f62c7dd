use serde::{Deserialize, Serialize};

/// Function minimised by the Frank-Wolfe line search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum LineSearchObjective {
    /// `Σ ∫ t(w) dw`, whose minimiser is the user equilibrium.
    #[default]
    Beckmann,
    /// `Σ x·t(x)`, whose minimiser is the system optimum.
    SystemTravelTime,
}

/// Tuning of the assignment algorithms. Every field falls back to its default
/// when missing from a parameters file.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssignmentParams {
    /// Number of equal demand slices loaded by the incremental method.
    pub increments: usize,
    pub max_iterations: usize,
    /// Relative gap (hours per vehicle) below which the solver stops.
    pub tolerance: f64,
    pub objective: LineSearchObjective,
    /// Bracket width at which the golden-section search stops.
    pub line_search_tolerance: f64,
    pub line_search_steps: usize,
    /// Iterations before stall detection may stop the solver.
    pub min_iterations: usize,
    /// Consecutive negligible steps that count as a stall.
    pub stall_iterations: usize,
    pub stall_step: f64,
    /// Logit dispersion θ of the path-flow decomposition.
    pub dispersion: f64,
    pub max_paths: usize,
}

impl Default for AssignmentParams {
    fn default() -> Self {
        Self {
            increments: 10,
            max_iterations: 100,
            tolerance: 1e-4,
            objective: LineSearchObjective::Beckmann,
            line_search_tolerance: 1e-7,
            line_search_steps: 30,
            min_iterations: 5,
            stall_iterations: 3,
            stall_step: 1e-6,
            dispersion: 0.5,
            max_paths: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let params: AssignmentParams =
            serde_json::from_str(r#"{"max_iterations": 40, "objective": "SystemTravelTime"}"#)
                .unwrap();
        assert_eq!(40, params.max_iterations);
        assert_eq!(LineSearchObjective::SystemTravelTime, params.objective);
        assert_eq!(AssignmentParams::default().increments, params.increments);
        assert_eq!(AssignmentParams::default().tolerance, params.tolerance);
    }
}
