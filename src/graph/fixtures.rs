use crate::graph::graph::Graph;
use crate::graph::link::Road;
use crate::graph::node::NodeId;

fn road(from: usize, to: usize, length: f64, capacity: f64, max_speed: f64) -> Road {
    Road {
        from: NodeId(from),
        to: NodeId(to),
        length,
        capacity,
        max_speed,
        bidirectional: true,
    }
}

/// A --10km-- B, capacity 1000, 100 km/h (t0 = 0.1h).
pub fn two_node() -> Graph {
    let mut graph = Graph::new();
    graph.add_node("A", 0.0, 0.0).unwrap();
    graph.add_node("B", 10.0, 0.0).unwrap();
    graph.add_link(road(0, 1, 10.0, 1000.0, 100.0)).unwrap();
    graph
}

//     B
//   /   \
//  A     D
//   \   /
//     C
// A-B-D costs 0.1 + 0.1, A-C-D costs 0.12 + 0.12 at free flow.
pub fn diamond() -> Graph {
    let mut graph = Graph::new();
    graph.add_node("A", 0.0, 0.0).unwrap();
    graph.add_node("B", 4.0, 3.0).unwrap();
    graph.add_node("C", 4.0, -3.0).unwrap();
    graph.add_node("D", 8.0, 0.0).unwrap();
    graph.add_link(road(0, 1, 5.0, 1000.0, 50.0)).unwrap();
    graph.add_link(road(1, 3, 5.0, 1000.0, 50.0)).unwrap();
    graph.add_link(road(0, 2, 6.0, 1500.0, 50.0)).unwrap();
    graph.add_link(road(2, 3, 6.0, 1500.0, 50.0)).unwrap();
    graph
}
