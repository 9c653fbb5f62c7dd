//! Network and demand files in the column-oriented JSON layout.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::graph::graph::Graph;
use crate::state::demand::DemandTable;

#[derive(Debug, Deserialize)]
pub struct NetworkFile {
    pub nodes: NodeColumns,
    pub links: LinkColumns,
}

#[derive(Debug, Deserialize)]
pub struct NodeColumns {
    pub name: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LinkColumns {
    pub between: Vec<Between>,
    pub capacity: Vec<f64>,
    #[serde(rename = "speedmax")]
    pub max_speed: Vec<f64>,
}

/// Endpoints of a road, either `"AB"` or `["A", "B"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Between {
    Joined(String),
    Pair([String; 2]),
}

impl Between {
    fn endpoints(&self) -> Result<(String, String)> {
        match self {
            Between::Joined(s) => {
                let chars = s.chars().collect::<Vec<char>>();
                if chars.len() != 2 {
                    bail!("Link `{s}` must name exactly two single-character nodes");
                }
                Ok((chars[0].to_string(), chars[1].to_string()))
            }
            Between::Pair([from, to]) => Ok((from.clone(), to.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DemandFile {
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub amount: Vec<f64>,
}

fn check_lengths(what: &str, lengths: &[usize]) -> Result<()> {
    if lengths.windows(2).any(|w| w[0] != w[1]) {
        bail!("Columns of `{what}` have different lengths: {lengths:?}");
    }
    Ok(())
}

impl NetworkFile {
    pub fn into_graph(self) -> Result<Graph> {
        let nodes = &self.nodes;
        check_lengths("nodes", &[nodes.name.len(), nodes.x.len(), nodes.y.len()])?;
        let links = &self.links;
        check_lengths(
            "links",
            &[links.between.len(), links.capacity.len(), links.max_speed.len()],
        )?;

        let mut graph = Graph::new();
        for ((name, x), y) in nodes.name.iter().zip(&nodes.x).zip(&nodes.y) {
            graph.add_node(name.as_str(), *x, *y)?;
        }
        for (i, between) in links.between.iter().enumerate() {
            let (from, to) = between.endpoints()?;
            graph
                .add_road(&from, &to, links.capacity[i], links.max_speed[i])
                .with_context(|| format!("Invalid link #{} ({from}->{to})", i + 1))?;
        }
        Ok(graph)
    }
}

impl DemandFile {
    pub fn into_table(self) -> Result<DemandTable> {
        check_lengths("demand", &[self.from.len(), self.to.len(), self.amount.len()])?;
        Ok(self
            .from
            .into_iter()
            .zip(self.to)
            .zip(self.amount)
            .map(|((from, to), amount)| (from, to, amount))
            .collect())
    }
}

/// Reads some deserializable data from a JSON file.
pub fn read_json<D: DeserializeOwned>(filename: &Path) -> Result<D> {
    let mut bytes = Vec::new();
    File::open(filename)
        .with_context(|| format!("Unable to open file `{filename:?}`"))?
        .read_to_end(&mut bytes)
        .with_context(|| format!("Unable to read file `{filename:?}`"))?;
    let data = serde_json::from_slice(&bytes)
        .with_context(|| format!("Unable to parse file `{filename:?}`"))?;
    Ok(data)
}

pub fn load_network(filename: &Path) -> Result<Graph> {
    let file: NetworkFile = read_json(filename)?;
    let graph = file
        .into_graph()
        .with_context(|| format!("Invalid network in `{filename:?}`"))?;
    info!(
        "Read network {filename:?}: {} nodes, {} links (both directions)",
        graph.node_count(),
        graph.link_count()
    );
    Ok(graph)
}

pub fn load_demand(filename: &Path) -> Result<DemandTable> {
    let file: DemandFile = read_json(filename)?;
    let table = file
        .into_table()
        .with_context(|| format!("Invalid demand in `{filename:?}`"))?;
    info!(
        "Read demand {filename:?}: {} OD pairs, {} veh/h in total",
        table.len(),
        table.total()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NETWORK: &str = r#"{
        "nodes": {"name": ["A", "B", "C"], "x": [0, 3, 3], "y": [0, 4, 0]},
        "links": {"between": ["AB", ["B", "C"]], "capacity": [1000, 500], "speedmax": [50, 40]}
    }"#;

    #[test]
    fn test_network_file_builds_bidirectional_graph() {
        let file: NetworkFile = serde_json::from_str(NETWORK).unwrap();
        let graph = file.into_graph().unwrap();
        assert_eq!(3, graph.node_count());
        assert_eq!(4, graph.link_count());

        let a = graph.node_id("A").unwrap();
        let ab = graph.link_by_id(graph.outgoing(a)[0].1);
        assert_relative_eq!(5.0, ab.length());
        assert_relative_eq!(0.1, ab.free_flow_time());
        assert!(ab.reverse().is_some());
    }

    #[test]
    fn test_unknown_endpoint_fails_the_load() {
        let json = NETWORK.replace("\"AB\"", "\"AZ\"");
        let file: NetworkFile = serde_json::from_str(&json).unwrap();
        let err = file.into_graph().unwrap_err();
        assert!(format!("{err:#}").contains("Unknown node `Z`"), "got: {err:#}");
    }

    #[test]
    fn test_mismatched_columns_fail_the_load() {
        let json = NETWORK.replace("[1000, 500]", "[1000]");
        let file: NetworkFile = serde_json::from_str(&json).unwrap();
        assert!(file.into_graph().is_err());

        let json = NETWORK.replace("\"AB\"", "\"ABC\"");
        let file: NetworkFile = serde_json::from_str(&json).unwrap();
        assert!(file.into_graph().is_err());
    }

    #[test]
    fn test_demand_file_to_table() {
        let file: DemandFile = serde_json::from_str(
            r#"{"from": ["A", "B", "A"], "to": ["C", "A", "C"], "amount": [100, 50.5, 300]}"#,
        )
        .unwrap();
        let table = file.into_table().unwrap();
        assert_eq!(2, table.len());
        assert_eq!(Some(300.0), table.get("A", "C"));
        assert_eq!(Some(50.5), table.get("B", "A"));
    }
}
