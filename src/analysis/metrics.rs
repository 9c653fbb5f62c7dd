use crate::analysis::summary::{CongestedLink, MethodSummary};
use crate::graph::graph::Graph;
use crate::graph::link::Link;
use crate::state::demand::DemandTable;
use crate::state::link_flows::LinkFlows;

/// Volume/capacity ratio at or above which a link counts as congested.
pub const CONGESTION_THRESHOLD: f64 = 0.8;

/// `Σ flow · travel_time(flow)` over every arc, in veh·h.
pub fn total_travel_time(graph: &Graph, flows: &LinkFlows) -> f64 {
    graph
        .links()
        .iter()
        .map(|l| {
            let flow = flows.get(l.id());
            flow * l.travel_time(flow)
        })
        .sum()
}

pub fn average_travel_time(graph: &Graph, flows: &LinkFlows, total_demand: f64) -> f64 {
    if total_demand > 0.0 {
        total_travel_time(graph, flows) / total_demand
    } else {
        0.0
    }
}

pub fn volume_capacity_ratio(link: &Link, flow: f64) -> f64 {
    if link.capacity() > 0.0 {
        flow / link.capacity()
    } else {
        0.0
    }
}

/// Links whose v/c ratio reaches `threshold`, most congested first.
pub fn congested_links(graph: &Graph, flows: &LinkFlows, threshold: f64) -> Vec<CongestedLink> {
    let mut congested = graph
        .links()
        .iter()
        .filter(|l| l.capacity() > 0.0)
        .map(|l| (l, volume_capacity_ratio(l, flows.get(l.id()))))
        .filter(|(_, ratio)| *ratio >= threshold)
        .map(|(l, ratio)| CongestedLink::new(l.id(), graph.link_label(l.id()), flows.get(l.id()), ratio))
        .collect::<Vec<CongestedLink>>();
    congested.sort_by(|a, b| b.ratio().total_cmp(&a.ratio()));
    congested
}

pub fn summarize(name: &str, graph: &Graph, flows: &LinkFlows, demand: &DemandTable) -> MethodSummary {
    let total_demand = demand.total();
    let ratios = graph
        .links()
        .iter()
        .filter(|l| l.capacity() > 0.0)
        .map(|l| volume_capacity_ratio(l, flows.get(l.id())))
        .collect::<Vec<f64>>();
    let (max_vc, avg_vc) = if ratios.is_empty() {
        (0.0, 0.0)
    } else {
        (
            ratios.iter().cloned().fold(0.0, f64::max),
            ratios.iter().sum::<f64>() / ratios.len() as f64,
        )
    };

    MethodSummary::new(
        name.to_string(),
        total_travel_time(graph, flows),
        average_travel_time(graph, flows, total_demand),
        max_vc,
        avg_vc,
        ratios.iter().filter(|r| **r >= CONGESTION_THRESHOLD).count(),
        total_demand,
    )
}

pub fn compare_methods(
    graph: &Graph,
    demand: &DemandTable,
    results: &[(&str, &LinkFlows)],
) -> Vec<MethodSummary> {
    results
        .iter()
        .map(|(name, flows)| summarize(name, graph, flows, demand))
        .collect()
}
