use crate::assignment::frank_wolfe::FrankWolfe;
use crate::state::iteration_log::Convergence;

pub struct App<'a> {
    pub solver: FrankWolfe<'a>,
    /// Steps every frame until the solver stops.
    pub running: bool,
    scenario: String,
}

impl<'a> App<'a> {
    pub fn new(solver: FrankWolfe<'a>, scenario: impl Into<String>) -> Self {
        Self {
            solver,
            running: false,
            scenario: scenario.into(),
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn step(&mut self) -> Option<Convergence> {
        let status = self.solver.step();
        if status.is_some() {
            self.running = false;
        }
        status
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running && self.solver.status().is_none();
    }
}

impl Drop for App<'_> {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

