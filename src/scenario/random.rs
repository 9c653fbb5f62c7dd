use anyhow::Result;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::graph::graph::Graph;
use crate::scenario::scenario::Scenario;
use crate::state::demand::DemandTable;

/// Jittered grid of two-way roads with random OD pairs, reproducible from its seed.
pub struct RandomGridScenario {
    seed: u64,
    rows: usize,
    cols: usize,
    pairs: usize,
}

impl RandomGridScenario {
    /// km between neighbouring intersections
    const SPACING: f64 = 2.0;

    pub fn new(seed: u64, rows: usize, cols: usize, pairs: usize) -> Self {
        Self {
            seed,
            rows,
            cols,
            pairs,
        }
    }

    fn node_name(row: usize, col: usize) -> String {
        format!("n{}-{}", row, col)
    }
}

impl Scenario for RandomGridScenario {
    fn name(&self) -> &str {
        "random"
    }

    fn build(&self) -> Result<(Graph, DemandTable)> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let capacities = [800.0, 1200.0, 1800.0];
        let speeds = [40.0, 50.0, 60.0];

        let mut graph = Graph::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = col as f64 * Self::SPACING + rng.gen_range(-0.3..0.3);
                let y = row as f64 * Self::SPACING + rng.gen_range(-0.3..0.3);
                graph.add_node(Self::node_name(row, col), x, y)?;
            }
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                let from = Self::node_name(row, col);
                let neighbours = [(row, col + 1), (row + 1, col)];
                for (r, c) in neighbours {
                    if r >= self.rows || c >= self.cols {
                        continue;
                    }
                    let capacity = capacities[rng.gen_range(0..capacities.len())];
                    let max_speed = speeds[rng.gen_range(0..speeds.len())];
                    graph.add_road(&from, &Self::node_name(r, c), capacity, max_speed)?;
                }
            }
        }

        let mut demand = DemandTable::new();
        let node_count = graph.node_count();
        if node_count > 1 {
            while demand.len() < self.pairs.min(node_count * (node_count - 1)) {
                let origin = rng.gen_range(0..node_count);
                let destination = rng.gen_range(0..node_count);
                if origin == destination {
                    continue;
                }
                let (o, d) = (graph.nodes()[origin].name(), graph.nodes()[destination].name());
                if demand.get(o, d).is_none() {
                    demand.insert(o, d, rng.gen_range(100.0..800.0_f64).round());
                }
            }
        }

        Ok((graph, demand))
    }
}
