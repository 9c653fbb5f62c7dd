use log::{debug, warn};

use crate::graph::graph::Graph;
use crate::state::demand::DemandTable;
use crate::state::link_flows::LinkFlows;

/// Loads each OD demand in `increments` equal slices, routing every slice on
/// the shortest path under the flows accumulated so far.
pub fn incremental(graph: &Graph, demand: &DemandTable, increments: usize) -> LinkFlows {
    let increments = if increments == 0 {
        warn!("Incremental assignment needs at least one increment, using 1");
        1
    } else {
        increments
    };

    let ods = demand.resolve(graph);
    let mut flows = LinkFlows::for_graph(graph);
    for pass in 1..=increments {
        debug!("Incremental pass {pass}/{increments}");
        for od in &ods {
            let path = graph.shortest_path(od.origin, od.destination, Some(&flows));
            if path.is_reachable() {
                flows.load_path(&path, od.demand / increments as f64);
            }
        }
    }
    flows
}
