use log::{debug, info};

use crate::analysis::metrics::total_travel_time;
use crate::assignment::aon::load_all_or_nothing;
use crate::assignment::line_search::{
    golden_section, max_abs, objective_along, resolution, successive_averages_step, StallDetector,
};
use crate::assignment::params::{AssignmentParams, LineSearchObjective};
use crate::graph::graph::Graph;
use crate::state::demand::{DemandTable, ResolvedOd};
use crate::state::iteration_log::{Convergence, IterationLog, IterationRecord};
use crate::state::link_flows::LinkFlows;

/// Largest direction component (veh/h) treated as no movement.
const DIRECTION_EPSILON: f64 = 1e-9;

pub struct EquilibriumResult {
    pub flows: LinkFlows,
    pub log: IterationLog,
    pub status: Convergence,
}

/// Frank-Wolfe user-equilibrium solver, advanced one iteration per [`FrankWolfe::step`].
pub struct FrankWolfe<'a> {
    graph: &'a Graph,
    ods: Vec<ResolvedOd>,
    total_demand: f64,
    params: AssignmentParams,
    flows: LinkFlows,
    log: IterationLog,
    stall: StallDetector,
    status: Option<Convergence>,
}

impl<'a> FrankWolfe<'a> {
    /// Starts from the free-flow all-or-nothing pattern.
    pub fn new(graph: &'a Graph, demand: &DemandTable, params: &AssignmentParams) -> Self {
        let ods = demand.resolve(graph);
        let total_demand = ods.iter().map(|od| od.demand).sum();
        let flows = load_all_or_nothing(graph, &ods, None);
        let status = if params.max_iterations == 0 {
            Some(Convergence::IterationLimit)
        } else {
            None
        };
        Self {
            graph,
            ods,
            total_demand,
            params: params.clone(),
            flows,
            log: IterationLog::new(),
            stall: StallDetector::new(
                params.min_iterations,
                params.stall_iterations,
                params.stall_step,
            ),
            status,
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn flows(&self) -> &LinkFlows {
        &self.flows
    }

    pub fn log(&self) -> &IterationLog {
        &self.log
    }

    pub fn status(&self) -> Option<Convergence> {
        self.status
    }

    pub fn params(&self) -> &AssignmentParams {
        &self.params
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    /// Runs one iteration unless the solver already stopped. Returns the final
    /// status once the run is over.
    pub fn step(&mut self) -> Option<Convergence> {
        if self.status.is_some() {
            return self.status;
        }

        let k = self.log.len();
        let graph = self.graph;
        let current = self.flows.as_slice();

        let times = graph
            .links()
            .iter()
            .map(|l| l.travel_time(current[l.id().index()]))
            .collect::<Vec<f64>>();
        let auxiliary = load_all_or_nothing(graph, &self.ods, Some(&self.flows));
        let direction = auxiliary
            .as_slice()
            .iter()
            .zip(current)
            .map(|(y, x)| y - x)
            .collect::<Vec<f64>>();

        // Σ t(x)·(x - y) is non-negative since y is a shortest-path loading under t(x)
        let gap = -times.iter().zip(&direction).map(|(t, d)| t * d).sum::<f64>();
        let relative_gap = if self.total_demand > 0.0 {
            gap.max(0.0) / self.total_demand
        } else {
            0.0
        };
        let converged = relative_gap < self.params.tolerance;

        let step = if converged || max_abs(&direction) < DIRECTION_EPSILON {
            0.0
        } else {
            let alpha = self.line_search(current, &direction);
            if alpha <= resolution(self.params.line_search_tolerance, self.params.line_search_steps) {
                successive_averages_step(k)
            } else {
                alpha
            }
        };

        if step > 0.0 {
            let updated = current
                .iter()
                .zip(&direction)
                .map(|(x, d)| (x + step * d).max(0.0))
                .collect::<Vec<f64>>();
            self.flows = LinkFlows::from_vec(updated);
        }

        let record = IterationRecord {
            iteration: k + 1,
            relative_gap,
            total_travel_time: total_travel_time(graph, &self.flows),
            step_size: step,
        };
        debug!(
            "Iteration {}: relative gap = {:.6e}, total time = {:.2}, step = {:.4}",
            record.iteration, record.relative_gap, record.total_travel_time, record.step_size
        );
        self.log.push(record);

        self.status = if converged {
            Some(Convergence::Converged)
        } else if self.stall.observe(k + 1, step) {
            Some(Convergence::Stalled)
        } else if k + 1 >= self.params.max_iterations {
            Some(Convergence::IterationLimit)
        } else {
            None
        };

        if let Some(status) = self.status {
            info!(
                "Frank-Wolfe stopped after {} iterations ({:?}), relative gap {:.6e}",
                k + 1,
                status,
                relative_gap
            );
        }
        self.status
    }

    fn line_search(&self, base: &[f64], direction: &[f64]) -> f64 {
        let links = self.graph.links();
        let objective = |alpha: f64| match self.params.objective {
            LineSearchObjective::Beckmann => objective_along(base, direction, alpha, |i, x| {
                links[i].travel_time_integral(x)
            }),
            LineSearchObjective::SystemTravelTime => {
                objective_along(base, direction, alpha, |i, x| x * links[i].travel_time(x))
            }
        };
        golden_section(
            objective,
            0.0,
            1.0,
            self.params.line_search_tolerance,
            self.params.line_search_steps,
        )
    }

    pub fn run(mut self) -> EquilibriumResult {
        let status = loop {
            if let Some(status) = self.step() {
                break status;
            }
        };
        EquilibriumResult {
            flows: self.flows,
            log: self.log,
            status,
        }
    }
}

/// Solves the user equilibrium with [`FrankWolfe`] until it stops.
pub fn user_equilibrium(graph: &Graph, demand: &DemandTable, params: &AssignmentParams) -> EquilibriumResult {
    FrankWolfe::new(graph, demand, params).run()
}
