//! Plain-text reports printed after a batch run.
use std::io::{Result, Write};

use crate::analysis::summary::{CongestedLink, MethodSummary};
use crate::assignment::path_flows::OdPathFlows;
use crate::graph::graph::Graph;
use crate::graph::path::Path;

/// Path-time spread (minutes) under which an OD pair counts as equilibrated.
pub const EQUILIBRIUM_SPREAD_MINUTES: f64 = 0.5;

/// Allowed gap (veh/h) between the split path flows and the OD demand.
const CONSERVATION_TOLERANCE: f64 = 1.0;

pub fn write_comparison<W: Write>(out: &mut W, summaries: &[MethodSummary]) -> Result<()> {
    let demand = summaries.first().map_or(0.0, |s| s.total_demand());
    writeln!(out, "Method comparison, {:.0} veh/h demand", demand)?;
    writeln!(
        out,
        "{:<14}{:>16}{:>14}{:>10}{:>10}{:>11}",
        "method", "total [veh.h]", "avg [min]", "max v/c", "avg v/c", "congested"
    )?;
    for summary in summaries {
        writeln!(
            out,
            "{:<14}{:>16.2}{:>14.2}{:>10.3}{:>10.3}{:>11}",
            summary.name(),
            summary.total_travel_time(),
            summary.average_travel_time() * 60.0,
            summary.max_vc_ratio(),
            summary.average_vc_ratio(),
            summary.congested_links(),
        )?;
    }

    let best = summaries
        .iter()
        .min_by(|a, b| a.total_travel_time().total_cmp(&b.total_travel_time()));
    if let Some(best) = best {
        writeln!(out, "Lowest total travel time: {}", best.name())?;
    }
    Ok(())
}

pub fn write_congested<W: Write>(out: &mut W, method: &str, links: &[CongestedLink]) -> Result<()> {
    if links.is_empty() {
        return writeln!(out, "{}: no congested links", method);
    }
    writeln!(out, "{}: {} congested links", method, links.len())?;
    for link in links {
        writeln!(
            out,
            "  #{:<4}{:<12}{:>10.1} veh/h  v/c {:.3}",
            link.link().index(),
            link.label(),
            link.flow(),
            link.ratio()
        )?;
    }
    Ok(())
}

/// One line per route query: node sequence and cost in minutes.
pub fn write_route<W: Write>(out: &mut W, label: &str, graph: &Graph, path: &Path) -> Result<()> {
    if !path.is_reachable() {
        return writeln!(out, "{:<14}no path", label);
    }
    writeln!(
        out,
        "{:<14}{} ({:.2} min)",
        label,
        graph.path_names(path).join("-"),
        path.cost() * 60.0
    )
}

/// Per-OD breakdown, largest demand first.
pub fn write_path_analysis<W: Write>(out: &mut W, breakdown: &[OdPathFlows]) -> Result<()> {
    let mut ods = breakdown.iter().collect::<Vec<&OdPathFlows>>();
    ods.sort_by(|a, b| b.demand.total_cmp(&a.demand));

    writeln!(out, "Path analysis")?;
    for od in ods {
        let spread = od.cost_spread() * 60.0;
        writeln!(
            out,
            "{} -> {}: {:.0} veh/h over {} paths, spread {:.2} min ({})",
            od.origin,
            od.destination,
            od.demand,
            od.paths.len(),
            spread,
            if spread < EQUILIBRIUM_SPREAD_MINUTES {
                "equilibrated"
            } else {
                "not equilibrated"
            }
        )?;
        for path in &od.paths {
            let share = if od.demand > 0.0 { path.flow / od.demand } else { 0.0 };
            writeln!(
                out,
                "  {:<30}{:>10.1} veh/h {:>6.1}%{:>8.2} min",
                path.nodes.join("-"),
                path.flow,
                share * 100.0,
                path.cost * 60.0
            )?;
        }

        let assigned = od.assigned();
        if (assigned - od.demand).abs() > CONSERVATION_TOLERANCE {
            writeln!(
                out,
                "  warning: paths carry {:.1} veh/h for a demand of {:.1}",
                assigned, od.demand
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::path_flows::PathFlow;
    use crate::graph::link::LinkId;

    fn od(origin: &str, demand: f64, flows: &[(f64, f64)]) -> OdPathFlows {
        OdPathFlows {
            origin: origin.to_string(),
            destination: "Z".to_string(),
            demand,
            paths: flows
                .iter()
                .map(|(flow, cost)| PathFlow {
                    nodes: vec![origin.to_string(), "Z".to_string()],
                    flow: *flow,
                    cost: *cost,
                })
                .collect(),
        }
    }

    fn render(breakdown: &[OdPathFlows]) -> String {
        let mut out = Vec::new();
        write_path_analysis(&mut out, breakdown).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_path_analysis_orders_by_demand() {
        let text = render(&[od("A", 100.0, &[(100.0, 0.2)]), od("B", 300.0, &[(300.0, 0.1)])]);
        let a = text.find("A -> Z").unwrap();
        let b = text.find("B -> Z").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_path_analysis_flags_spread_and_conservation() {
        // 0.02 h = 1.2 min spread, 10 veh/h missing
        let text = render(&[od("A", 200.0, &[(150.0, 0.10), (40.0, 0.12)])]);
        assert!(text.contains("spread 1.20 min (not equilibrated)"));
        assert!(text.contains("warning: paths carry 190.0 veh/h"));

        let text = render(&[od("A", 200.0, &[(100.0, 0.100), (100.0, 0.105)])]);
        assert!(text.contains("(equilibrated)"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_comparison_names_best_method() {
        let summaries = [
            MethodSummary::new("aon".to_string(), 900.0, 0.5, 1.4, 0.6, 3, 1800.0),
            MethodSummary::new("ue".to_string(), 700.0, 0.39, 0.9, 0.5, 1, 1800.0),
        ];
        let mut out = Vec::new();
        write_comparison(&mut out, &summaries).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Lowest total travel time: ue"));
        assert_eq!(5, text.lines().count());
    }

    #[test]
    fn test_route_lines() {
        let graph = crate::graph::fixtures::diamond();
        let mut out = Vec::new();
        let free = graph.shortest_path_by_names("A", "D", None);
        write_route(&mut out, "free flow", &graph, &free).unwrap();
        write_route(&mut out, "loaded", &graph, &graph.shortest_path_by_names("A", "Q", None)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("A-B-D (12.00 min)"), "{text}");
        assert!(text.contains("loaded        no path"), "{text}");
    }

    #[test]
    fn test_congested_listing() {
        let mut out = Vec::new();
        write_congested(&mut out, "ue", &[]).unwrap();
        let links = [CongestedLink::new(LinkId(2), "A->B".to_string(), 950.0, 0.95)];
        write_congested(&mut out, "aon", &links).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ue: no congested links"));
        assert!(text.contains("aon: 1 congested links"));
        assert!(text.contains("A->B"));
    }
}
