use crate::graph::link::LinkId;
use crate::graph::node::NodeId;

/// Result of a least-cost search. An empty node list with infinite cost means
/// the destination is unreachable.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    nodes: Vec<NodeId>,
    links: Vec<LinkId>,
    cost: f64,
}

impl Path {
    pub fn new(nodes: Vec<NodeId>, links: Vec<LinkId>, cost: f64) -> Self {
        Self { nodes, links, cost }
    }

    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}
