use std::path::PathBuf;

use anyhow::Result;

use crate::graph::graph::Graph;
use crate::io::json::{load_demand, load_network};
use crate::scenario::scenario::Scenario;
use crate::state::demand::DemandTable;

/// Network and demand read from JSON files.
pub struct FileScenario {
    network: PathBuf,
    demand: PathBuf,
}

impl FileScenario {
    pub fn new(network: PathBuf, demand: PathBuf) -> Self {
        Self { network, demand }
    }
}

impl Scenario for FileScenario {
    fn name(&self) -> &str {
        "file"
    }

    fn build(&self) -> Result<(Graph, DemandTable)> {
        let graph = load_network(&self.network)?;
        let demand = load_demand(&self.demand)?;
        Ok((graph, demand))
    }
}
