use anyhow::Result;

use crate::graph::graph::Graph;
use crate::state::demand::DemandTable;

/// Source of a road network together with its travel demand.
pub trait Scenario {
    fn name(&self) -> &str;
    fn build(&self) -> Result<(Graph, DemandTable)>;
}
