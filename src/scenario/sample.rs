use anyhow::Result;

use crate::graph::graph::Graph;
use crate::scenario::scenario::Scenario;
use crate::state::demand::DemandTable;

/// Six-node test network with two corridors between A and F.
pub struct SampleScenario;

impl Scenario for SampleScenario {
    fn name(&self) -> &str {
        "sample"
    }

    fn build(&self) -> Result<(Graph, DemandTable)> {
        let mut graph = Graph::new();
        for (name, x, y) in [
            ("A", 0.0, 0.0),
            ("B", 5.0, 4.0),
            ("C", 5.0, -4.0),
            ("D", 10.0, 4.0),
            ("E", 10.0, -4.0),
            ("F", 15.0, 0.0),
        ] {
            graph.add_node(name, x, y)?;
        }

        for (from, to, capacity, max_speed) in [
            ("A", "B", 1800.0, 60.0),
            ("A", "C", 1500.0, 50.0),
            ("B", "C", 800.0, 40.0),
            ("B", "D", 1600.0, 60.0),
            ("C", "E", 1400.0, 50.0),
            ("B", "E", 900.0, 40.0),
            ("D", "E", 700.0, 40.0),
            ("D", "F", 1800.0, 60.0),
            ("E", "F", 1500.0, 50.0),
        ] {
            graph.add_road(from, to, capacity, max_speed)?;
        }

        let demand = [
            ("A", "F", 2000.0),
            ("A", "D", 800.0),
            ("B", "F", 600.0),
            ("C", "D", 500.0),
            ("F", "A", 700.0),
            ("E", "B", 300.0),
        ]
        .into_iter()
        .collect();

        Ok((graph, demand))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::aon::all_or_nothing;
    use crate::assignment::frank_wolfe::user_equilibrium;
    use crate::assignment::incremental::incremental;
    use crate::assignment::params::AssignmentParams;
    use crate::analysis::metrics::total_travel_time;

    #[test]
    fn test_sample_network_shape() {
        let (graph, demand) = SampleScenario.build().unwrap();
        assert_eq!(6, graph.node_count());
        assert_eq!(18, graph.link_count());
        assert_eq!(6, demand.len());
        assert!(graph.links().iter().all(|l| l.reverse().is_some()));
    }

    #[test]
    fn test_methods_rank_by_total_travel_time() {
        let (graph, demand) = SampleScenario.build().unwrap();
        let aon = all_or_nothing(&graph, &demand);
        let inc = incremental(&graph, &demand, 10);
        let ue = user_equilibrium(&graph, &demand, &AssignmentParams::default());

        let aon_time = total_travel_time(&graph, &aon);
        let inc_time = total_travel_time(&graph, &inc);
        let ue_time = total_travel_time(&graph, &ue.flows);
        assert!(ue_time < aon_time);
        assert!(inc_time < aon_time);

        let gaps = ue.log.records().iter().map(|r| r.relative_gap).collect::<Vec<f64>>();
        assert!(gaps.last().unwrap() < &(gaps[0] / 100.0));
        for flows in [&aon, &inc, &ue.flows] {
            assert!(flows.iter().all(|(_, f)| f >= 0.0));
        }
    }
}
