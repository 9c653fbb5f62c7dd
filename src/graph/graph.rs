use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::ops::Deref;

use crate::graph::error::GraphError;
use crate::graph::link::{Link, LinkId, Road};
use crate::graph::node::{Node, NodeId};
use crate::graph::path::Path;
use crate::state::link_flows::LinkFlows;

#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    names: HashMap<String, NodeId>,
    adj: Vec<Vec<(NodeId, LinkId)>>,
    radj: Vec<Vec<(NodeId, LinkId)>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, x: f64, y: f64) -> Result<NodeId, GraphError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateKey(name));
        }
        let id = NodeId(self.nodes.len());
        self.names.insert(name.clone(), id);
        self.nodes.push(Node::new(id, name, x, y));
        self.adj.push(Vec::new());
        self.radj.push(Vec::new());
        Ok(id)
    }

    /// Inserts the forward arc and, for bidirectional roads, its paired reverse
    /// arc under the next link id. Returns the forward arc id.
    pub fn add_link(&mut self, road: Road) -> Result<LinkId, GraphError> {
        for endpoint in [road.from, road.to] {
            if endpoint.index() >= self.nodes.len() {
                return Err(GraphError::unknown_id(endpoint));
            }
        }

        let forward_id = LinkId(self.links.len());
        let mut forward = Link::forward(forward_id, &road);
        let reverse = if road.bidirectional {
            let reverse_id = LinkId(forward_id.index() + 1);
            forward.pair_with(reverse_id);
            Some(forward.reversed(reverse_id))
        } else {
            None
        };

        self.insert_arc(forward);
        if let Some(reverse) = reverse {
            self.insert_arc(reverse);
        }
        Ok(forward_id)
    }

    /// Adds a bidirectional road whose length is the distance between its
    /// endpoints.
    pub fn add_road(
        &mut self,
        from_name: &str,
        to_name: &str,
        capacity: f64,
        max_speed: f64,
    ) -> Result<LinkId, GraphError> {
        let from = self
            .node_id(from_name)
            .ok_or_else(|| GraphError::UnknownNode(from_name.to_string()))?;
        let to = self
            .node_id(to_name)
            .ok_or_else(|| GraphError::UnknownNode(to_name.to_string()))?;
        let length = self.node_by_id(from).distance_to(self.node_by_id(to));
        self.add_link(Road {
            from,
            to,
            length,
            capacity,
            max_speed,
            bidirectional: true,
        })
    }

    fn insert_arc(&mut self, link: Link) {
        self.adj[link.from().index()].push((link.to(), link.id()));
        self.radj[link.to().index()].push((link.from(), link.id()));
        self.links.push(link);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node_by_id(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn link_by_id(&self, id: LinkId) -> &Link {
        &self.links[id.index()]
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index())
    }

    pub fn outgoing(&self, id: NodeId) -> &[(NodeId, LinkId)] {
        &self.adj[id.index()]
    }

    pub fn incoming(&self, id: NodeId) -> &[(NodeId, LinkId)] {
        &self.radj[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.name())
    }

    pub fn link_between(&self, from: NodeId, to: NodeId) -> Option<&Link> {
        self.adj
            .get(from.index())?
            .iter()
            .find(|(next, _)| *next == to)
            .map(|(_, link)| self.link_by_id(*link))
    }

    /// `"A->B"` label of an arc.
    pub fn link_label(&self, id: LinkId) -> String {
        let link = self.link_by_id(id);
        format!(
            "{}->{}",
            self.node_by_id(link.from()).name(),
            self.node_by_id(link.to()).name()
        )
    }

    pub fn path_names(&self, path: &Path) -> Vec<String> {
        path.nodes()
            .iter()
            .map(|id| self.node_by_id(*id).name().to_string())
            .collect()
    }

    /// Dijkstra over `travel_time(flow)`, free-flow costs when `flows` is `None`.
    ///
    /// Among frontier nodes with equal tentative cost the smallest [`NodeId`] is
    /// settled first, and labels are only replaced on strict improvement, so the
    /// result never depends on insertion order of equal-cost alternatives.
    pub fn shortest_path(
        &self,
        origin: NodeId,
        destination: NodeId,
        flows: Option<&LinkFlows>,
    ) -> Path {
        let n = self.nodes.len();
        if origin.index() >= n || destination.index() >= n {
            return Path::unreachable();
        }

        let mut dist = vec![f64::INFINITY; n];
        let mut pred: Vec<Option<(NodeId, LinkId)>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut queue = BinaryHeap::new();

        dist[origin.index()] = 0.0;
        queue.push(Label {
            cost: 0.0,
            node: origin,
        });

        while let Some(Label { cost, node }) = queue.pop() {
            if settled[node.index()] {
                continue;
            }
            settled[node.index()] = true;
            if node == destination {
                break;
            }

            for &(next, link_id) in &self.adj[node.index()] {
                if settled[next.index()] {
                    continue;
                }
                let flow = flows.map_or(0.0, |f| f.get(link_id));
                let candidate = cost + self.link_by_id(link_id).travel_time(flow);
                if candidate < dist[next.index()] {
                    dist[next.index()] = candidate;
                    pred[next.index()] = Some((node, link_id));
                    queue.push(Label {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        let cost = dist[destination.index()];
        if !cost.is_finite() {
            return Path::unreachable();
        }

        let mut nodes = vec![destination];
        let mut links = Vec::new();
        let mut current = destination;
        while current != origin {
            match pred[current.index()] {
                Some((prev, link)) => {
                    nodes.push(prev);
                    links.push(link);
                    current = prev;
                }
                None => return Path::unreachable(),
            }
        }
        nodes.reverse();
        links.reverse();
        Path::new(nodes, links, cost)
    }

    /// [`Graph::shortest_path`] between two named nodes. Unknown names give an
    /// unreachable path.
    pub fn shortest_path_by_names(&self, origin: &str, destination: &str, flows: Option<&LinkFlows>) -> Path {
        match (self.node_id(origin), self.node_id(destination)) {
            (Some(o), Some(d)) => self.shortest_path(o, d, flows),
            _ => Path::unreachable(),
        }
    }

    /// Shortest path plus detours found by banning, one at a time, each arc of
    /// the shortest path. Not a true k-shortest-paths algorithm. Identical node
    /// sequences are reported once. The adjacency is restored after each trial.
    pub fn k_alternative_paths(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        max_paths: usize,
        flows: Option<&LinkFlows>,
    ) -> Vec<Path> {
        let mut paths: Vec<Path> = Vec::new();
        if max_paths == 0 {
            return paths;
        }

        let main = self.shortest_path(origin, destination, flows);
        if !main.is_reachable() {
            return paths;
        }
        let banned = main.links().to_vec();
        paths.push(main);

        for link in banned {
            if paths.len() >= max_paths {
                break;
            }
            let candidate = {
                let mut removal = LinkRemoval::new(self);
                removal.remove(link);
                removal.shortest_path(origin, destination, flows)
            };
            if candidate.is_reachable() && paths.iter().all(|p| p.nodes() != candidate.nodes()) {
                paths.push(candidate);
            }
        }
        paths
    }
}

#[derive(Clone, Copy, PartialEq)]
struct Label {
    cost: f64,
    node: NodeId,
}

impl Eq for Label {}

impl Ord for Label {
    // reversed: BinaryHeap is a max-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy)]
enum Side {
    Forward,
    Backward,
}

/// Temporarily hides arcs from the adjacency indices. Every removal is undone,
/// in reverse order and at its original position, when the guard is dropped.
struct LinkRemoval<'a> {
    graph: &'a mut Graph,
    undo: Vec<(Side, NodeId, usize, (NodeId, LinkId))>,
}

impl<'a> LinkRemoval<'a> {
    fn new(graph: &'a mut Graph) -> Self {
        Self {
            graph,
            undo: Vec::new(),
        }
    }

    fn remove(&mut self, link: LinkId) {
        let Some(arc) = self.graph.link(link) else {
            return;
        };
        let (from, to) = (arc.from(), arc.to());
        for (side, node) in [(Side::Forward, from), (Side::Backward, to)] {
            let list = match side {
                Side::Forward => &mut self.graph.adj[node.index()],
                Side::Backward => &mut self.graph.radj[node.index()],
            };
            if let Some(pos) = list.iter().position(|(_, l)| *l == link) {
                let entry = list.remove(pos);
                self.undo.push((side, node, pos, entry));
            }
        }
    }
}

impl Deref for LinkRemoval<'_> {
    type Target = Graph;

    fn deref(&self) -> &Graph {
        self.graph
    }
}

impl Drop for LinkRemoval<'_> {
    fn drop(&mut self) {
        while let Some((side, node, pos, entry)) = self.undo.pop() {
            let list = match side {
                Side::Forward => &mut self.graph.adj[node.index()],
                Side::Backward => &mut self.graph.radj[node.index()],
            };
            list.insert(pos, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::{diamond, two_node};
    use approx::assert_relative_eq;

    #[test]
    fn test_duplicate_node_name_is_rejected() {
        let mut graph = Graph::new();
        graph.add_node("A", 0.0, 0.0).unwrap();
        assert_eq!(
            Err(GraphError::DuplicateKey("A".to_string())),
            graph.add_node("A", 1.0, 1.0)
        );
        assert_eq!(1, graph.node_count());
    }

    #[test]
    fn test_link_with_unknown_endpoint_is_rejected() {
        let mut graph = Graph::new();
        graph.add_node("A", 0.0, 0.0).unwrap();
        let err = graph.add_road("A", "Z", 100.0, 50.0).unwrap_err();
        assert_eq!(GraphError::UnknownNode("Z".to_string()), err);

        let err = graph
            .add_link(Road {
                from: NodeId(0),
                to: NodeId(3),
                length: 1.0,
                capacity: 1.0,
                max_speed: 1.0,
                bidirectional: false,
            })
            .unwrap_err();
        assert_eq!(GraphError::unknown_id(NodeId(3)), err);
        assert_eq!(0, graph.link_count());
    }

    #[test]
    fn test_bidirectional_road_creates_paired_arcs() {
        let graph = two_node();
        assert_eq!(2, graph.link_count());

        let forward = graph.link_by_id(LinkId(0));
        let reverse = graph.link_by_id(LinkId(1));
        assert_eq!(Some(LinkId(1)), forward.reverse());
        assert_eq!(Some(LinkId(0)), reverse.reverse());
        assert_eq!(forward.from(), reverse.to());
        assert_relative_eq!(forward.capacity(), reverse.capacity());
        assert_relative_eq!(forward.free_flow_time(), reverse.free_flow_time());
    }

    #[test]
    fn test_adjacency_matches_link_set() {
        let graph = diamond();
        for link in graph.links() {
            assert!(graph.outgoing(link.from()).contains(&(link.to(), link.id())));
            assert!(graph.incoming(link.to()).contains(&(link.from(), link.id())));
        }
        let out_total: usize = graph.nodes().iter().map(|n| graph.outgoing(n.id()).len()).sum();
        let in_total: usize = graph.nodes().iter().map(|n| graph.incoming(n.id()).len()).sum();
        assert_eq!(graph.link_count(), out_total);
        assert_eq!(graph.link_count(), in_total);
    }

    #[test]
    fn test_add_road_derives_length_from_coordinates() {
        let mut graph = Graph::new();
        graph.add_node("A", 0.0, 0.0).unwrap();
        graph.add_node("B", 6.0, 8.0).unwrap();
        let id = graph.add_road("A", "B", 1000.0, 50.0).unwrap();
        assert_relative_eq!(10.0, graph.link_by_id(id).length());
        assert_relative_eq!(0.2, graph.link_by_id(id).free_flow_time());
    }

    #[test]
    fn test_lookups_report_missing_entries() {
        let graph = two_node();
        assert_eq!(Some(NodeId(1)), graph.node_id("B"));
        assert_eq!(None, graph.node_id("Q"));
        assert_eq!(Some("A"), graph.node_name(NodeId(0)));
        assert_eq!(None, graph.node_name(NodeId(9)));
        assert!(graph.link(LinkId(5)).is_none());
        assert_eq!(
            Some(LinkId(1)),
            graph.link_between(NodeId(1), NodeId(0)).map(|l| l.id())
        );
        assert_eq!("B->A", graph.link_label(LinkId(1)));
    }

    #[test]
    fn test_shortest_path_free_flow() {
        let graph = diamond();
        let path = graph.shortest_path(NodeId(0), NodeId(3), None);
        assert_eq!(vec![NodeId(0), NodeId(1), NodeId(3)], path.nodes());
        assert_eq!(2, path.links().len());
        assert_relative_eq!(0.2, path.cost(), epsilon = 1e-12);
    }

    #[test]
    fn test_shortest_path_tie_break_prefers_lowest_node_id() {
        // both branches of the diamond cost the same; insert the C branch first
        let mut graph = Graph::new();
        for (name, x) in [("A", 0.0), ("B", 1.0), ("C", 1.0), ("D", 2.0)] {
            graph.add_node(name, x, 0.0).unwrap();
        }
        for (from, to) in [(0, 2), (2, 3), (0, 1), (1, 3)] {
            graph
                .add_link(Road {
                    from: NodeId(from),
                    to: NodeId(to),
                    length: 5.0,
                    capacity: 1000.0,
                    max_speed: 50.0,
                    bidirectional: true,
                })
                .unwrap();
        }
        let first = graph.shortest_path(NodeId(0), NodeId(3), None);
        let second = graph.shortest_path(NodeId(0), NodeId(3), None);
        assert_eq!(vec![NodeId(0), NodeId(1), NodeId(3)], first.nodes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_shortest_path_avoids_congestion() {
        let graph = diamond();
        let mut flows = LinkFlows::for_graph(&graph);
        let upper = graph.link_between(NodeId(0), NodeId(1)).unwrap().id();
        flows.add(upper, 1000.0);

        let path = graph.shortest_path(NodeId(0), NodeId(3), Some(&flows));
        assert_eq!(vec![NodeId(0), NodeId(2), NodeId(3)], path.nodes());
    }

    #[test]
    fn test_unreachable_destination() {
        let mut graph = two_node();
        let island = graph.add_node("Z", 50.0, 50.0).unwrap();
        let path = graph.shortest_path(NodeId(0), island, None);
        assert!(!path.is_reachable());
        assert!(path.nodes().is_empty());
        assert!(path.cost().is_infinite());
        assert!(graph.k_alternative_paths(NodeId(0), island, 5, None).is_empty());
    }

    #[test]
    fn test_shortest_path_by_names() {
        let graph = diamond();
        let free = graph.shortest_path_by_names("A", "D", None);
        assert_eq!(vec!["A", "B", "D"], graph.path_names(&free));
        assert_relative_eq!(0.2, free.cost(), epsilon = 1e-12);

        let mut flows = LinkFlows::for_graph(&graph);
        flows.add(graph.link_between(NodeId(0), NodeId(1)).unwrap().id(), 1000.0);
        let loaded = graph.shortest_path_by_names("A", "D", Some(&flows));
        assert_eq!(vec!["A", "C", "D"], graph.path_names(&loaded));
        assert_relative_eq!(0.24, loaded.cost(), epsilon = 1e-12);

        assert!(!graph.shortest_path_by_names("A", "X", None).is_reachable());
        assert!(!graph.shortest_path_by_names("X", "A", Some(&flows)).is_reachable());
    }

    #[test]
    fn test_origin_equals_destination() {
        let graph = two_node();
        let path = graph.shortest_path(NodeId(0), NodeId(0), None);
        assert_eq!(vec![NodeId(0)], path.nodes());
        assert!(path.links().is_empty());
        assert_relative_eq!(0.0, path.cost());
    }

    #[test]
    fn test_alternative_paths_restore_adjacency() {
        let mut graph = diamond();
        let before = graph
            .nodes()
            .iter()
            .map(|n| (graph.outgoing(n.id()).to_vec(), graph.incoming(n.id()).to_vec()))
            .collect::<Vec<_>>();

        let paths = graph.k_alternative_paths(NodeId(0), NodeId(3), 10, None);
        assert_eq!(2, paths.len());
        assert_eq!(vec![NodeId(0), NodeId(1), NodeId(3)], paths[0].nodes());
        assert_eq!(vec![NodeId(0), NodeId(2), NodeId(3)], paths[1].nodes());

        let after = graph
            .nodes()
            .iter()
            .map(|n| (graph.outgoing(n.id()).to_vec(), graph.incoming(n.id()).to_vec()))
            .collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn test_alternative_paths_respect_limit() {
        let mut graph = diamond();
        let paths = graph.k_alternative_paths(NodeId(0), NodeId(3), 1, None);
        assert_eq!(1, paths.len());
        assert!(graph.k_alternative_paths(NodeId(0), NodeId(3), 0, None).is_empty());
    }
}
