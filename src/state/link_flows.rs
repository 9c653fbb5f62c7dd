use crate::graph::graph::Graph;
use crate::graph::link::LinkId;
use crate::graph::path::Path;

/// Aggregate flow (veh/h) on every link of a graph, indexed by [`LinkId`].
#[derive(Clone, Debug, PartialEq)]
pub struct LinkFlows {
    flows: Vec<f64>,
}

impl LinkFlows {
    pub fn zeros(link_count: usize) -> Self {
        Self {
            flows: vec![0.0; link_count],
        }
    }

    pub fn for_graph(graph: &Graph) -> Self {
        Self::zeros(graph.link_count())
    }

    pub fn from_vec(flows: Vec<f64>) -> Self {
        Self { flows }
    }

    pub fn get(&self, id: LinkId) -> f64 {
        self.flows.get(id.index()).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, id: LinkId, flow: f64) {
        self.flows[id.index()] += flow;
    }

    pub fn load_path(&mut self, path: &Path, amount: f64) {
        path.links().iter().for_each(|id| self.add(*id, amount));
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinkId, f64)> + '_ {
        self.flows.iter().enumerate().map(|(i, f)| (LinkId(i), *f))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }
}
