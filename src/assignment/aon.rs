use log::debug;

use crate::graph::graph::Graph;
use crate::state::demand::{DemandTable, ResolvedOd};
use crate::state::link_flows::LinkFlows;

/// Loads every OD demand onto its free-flow shortest path.
pub fn all_or_nothing(graph: &Graph, demand: &DemandTable) -> LinkFlows {
    let ods = demand.resolve(graph);
    load_all_or_nothing(graph, &ods, None)
}

/// All-or-nothing loading under the costs induced by `costs` (free flow when `None`).
pub fn load_all_or_nothing(graph: &Graph, ods: &[ResolvedOd], costs: Option<&LinkFlows>) -> LinkFlows {
    let mut flows = LinkFlows::for_graph(graph);
    ods.iter().for_each(|od| {
        let path = graph.shortest_path(od.origin, od.destination, costs);
        if path.is_reachable() {
            flows.load_path(&path, od.demand);
        } else {
            debug!(
                "No route between {} and {}",
                graph.node_by_id(od.origin).name(),
                graph.node_by_id(od.destination).name()
            );
        }
    });
    flows
}
