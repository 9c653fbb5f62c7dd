use log::debug;

use crate::graph::graph::Graph;
use crate::state::demand::DemandTable;
use crate::state::link_flows::LinkFlows;

#[derive(Clone, Debug, PartialEq)]
pub struct PathFlow {
    pub nodes: Vec<String>,
    /// veh/h
    pub flow: f64,
    /// hours
    pub cost: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OdPathFlows {
    pub origin: String,
    pub destination: String,
    pub demand: f64,
    pub paths: Vec<PathFlow>,
}

impl OdPathFlows {
    pub fn assigned(&self) -> f64 {
        self.paths.iter().map(|p| p.flow).sum()
    }

    /// Difference between the slowest and the fastest enumerated path.
    pub fn cost_spread(&self) -> f64 {
        let (min, max) = self
            .paths
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.cost), hi.max(p.cost))
            });
        if self.paths.is_empty() { 0.0 } else { max - min }
    }
}

/// Splits every OD demand over alternative paths costed under `flows`, with
/// logit weights `exp(-θ (cost - min_cost))`.
///
/// Reporting approximation only: the split does not reproduce `flows`.
pub fn path_flows(
    graph: &mut Graph,
    demand: &DemandTable,
    flows: &LinkFlows,
    dispersion: f64,
    max_paths: usize,
) -> Vec<OdPathFlows> {
    let ods = demand.resolve(graph);
    ods.iter()
        .filter_map(|od| {
            let pair = &demand.pairs()[od.pair];
            let paths = graph.k_alternative_paths(od.origin, od.destination, max_paths, Some(flows));
            if paths.is_empty() {
                debug!("No path for {}->{}", pair.origin(), pair.destination());
                return None;
            }

            let min_cost = paths
                .iter()
                .map(|p| p.cost())
                .fold(f64::INFINITY, f64::min);
            let weights = paths
                .iter()
                .map(|p| (-dispersion * (p.cost() - min_cost)).exp())
                .collect::<Vec<f64>>();
            let total_weight = weights.iter().sum::<f64>();

            let split = paths
                .iter()
                .zip(&weights)
                .map(|(path, weight)| PathFlow {
                    nodes: graph.path_names(path),
                    flow: if total_weight > 0.0 {
                        od.demand * weight / total_weight
                    } else {
                        od.demand / paths.len() as f64
                    },
                    cost: path.cost(),
                })
                .collect();

            Some(OdPathFlows {
                origin: pair.origin().to_string(),
                destination: pair.destination().to_string(),
                demand: od.demand,
                paths: split,
            })
        })
        .collect()
}
