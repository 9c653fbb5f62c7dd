//! CSV exports of assignment results.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use serde::Serialize;

use crate::analysis::metrics::volume_capacity_ratio;
use crate::graph::graph::Graph;
use crate::state::iteration_log::IterationLog;
use crate::state::link_flows::LinkFlows;

#[derive(Debug, Serialize)]
struct LinkResultRow<'a> {
    link_id: usize,
    from_node: &'a str,
    to_node: &'a str,
    length_km: f64,
    max_speed_kmh: f64,
    free_flow_time_min: f64,
    capacity_veh_h: f64,
    flow_veh_h: f64,
    v_c_ratio: f64,
    travel_time_min: f64,
    additional_delay_min: f64,
}

pub fn write_link_results<W: Write>(writer: W, graph: &Graph, flows: &LinkFlows) -> Result<()> {
    if flows.len() != graph.link_count() {
        bail!(
            "Flow vector covers {} links, the network has {}",
            flows.len(),
            graph.link_count()
        );
    }
    let mut writer = csv::Writer::from_writer(writer);
    for link in graph.links() {
        let flow = flows.get(link.id());
        let travel_time_min = 60.0 * link.travel_time(flow);
        let free_flow_time_min = 60.0 * link.free_flow_time();
        writer.serialize(LinkResultRow {
            link_id: link.id().index(),
            from_node: graph.node_by_id(link.from()).name(),
            to_node: graph.node_by_id(link.to()).name(),
            length_km: link.length(),
            max_speed_kmh: link.max_speed(),
            free_flow_time_min,
            capacity_veh_h: link.capacity(),
            flow_veh_h: flow,
            v_c_ratio: volume_capacity_ratio(link, flow),
            travel_time_min,
            additional_delay_min: travel_time_min - free_flow_time_min,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_iteration_log<W: Write>(writer: W, log: &IterationLog) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in log.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_link_results(filename: &Path, graph: &Graph, flows: &LinkFlows) -> Result<()> {
    let file = File::create(filename).with_context(|| format!("Unable to create `{filename:?}`"))?;
    write_link_results(file, graph, flows)
        .with_context(|| format!("Unable to write results to `{filename:?}`"))?;
    info!("Saved link results to {filename:?}");
    Ok(())
}

pub fn save_iteration_log(filename: &Path, log: &IterationLog) -> Result<()> {
    let file = File::create(filename).with_context(|| format!("Unable to create `{filename:?}`"))?;
    write_iteration_log(file, log)
        .with_context(|| format!("Unable to write iteration log to `{filename:?}`"))?;
    info!("Saved iteration log to {filename:?}");
    Ok(())
}
