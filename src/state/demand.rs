use log::{debug, warn};

use crate::graph::graph::Graph;
use crate::graph::node::NodeId;

#[derive(Clone, Debug, PartialEq)]
pub struct OdPair {
    origin: String,
    destination: String,
    /// veh/h
    demand: f64,
}

impl OdPair {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }
}

/// OD pair resolved against a graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedOd {
    /// position in the demand table
    pub pair: usize,
    pub origin: NodeId,
    pub destination: NodeId,
    pub demand: f64,
}

/// Ordered origin/destination demand table keyed by node names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemandTable {
    pairs: Vec<OdPair>,
}

impl DemandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the demand of a pair, replacing an earlier entry for the same pair.
    pub fn insert(&mut self, origin: impl Into<String>, destination: impl Into<String>, demand: f64) {
        let (origin, destination) = (origin.into(), destination.into());
        match self
            .pairs
            .iter_mut()
            .find(|p| p.origin == origin && p.destination == destination)
        {
            Some(pair) => pair.demand = demand,
            None => self.pairs.push(OdPair {
                origin,
                destination,
                demand,
            }),
        }
    }

    pub fn pairs(&self) -> &[OdPair] {
        &self.pairs
    }

    pub fn get(&self, origin: &str, destination: &str) -> Option<f64> {
        self.pairs
            .iter()
            .find(|p| p.origin == origin && p.destination == destination)
            .map(|p| p.demand)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sum of the positive demands.
    pub fn total(&self) -> f64 {
        self.pairs.iter().map(|p| p.demand).filter(|d| *d > 0.0).sum()
    }

    /// Resolves names to node ids. Pairs without positive demand are dropped,
    /// pairs naming unknown nodes are skipped with a warning.
    pub fn resolve(&self, graph: &Graph) -> Vec<ResolvedOd> {
        self.pairs
            .iter()
            .enumerate()
            .filter_map(|(index, pair)| {
                if pair.demand <= 0.0 {
                    debug!(
                        "Ignoring OD pair {}->{} with demand {}",
                        pair.origin, pair.destination, pair.demand
                    );
                    return None;
                }
                match (graph.node_id(&pair.origin), graph.node_id(&pair.destination)) {
                    (Some(origin), Some(destination)) => Some(ResolvedOd {
                        pair: index,
                        origin,
                        destination,
                        demand: pair.demand,
                    }),
                    _ => {
                        warn!(
                            "Skipping OD pair {}->{}: unknown node",
                            pair.origin, pair.destination
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, S, f64)> for DemandTable {
    fn from_iter<I: IntoIterator<Item = (S, S, f64)>>(iter: I) -> Self {
        let mut table = DemandTable::new();
        iter.into_iter()
            .for_each(|(origin, destination, demand)| table.insert(origin, destination, demand));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::diamond;
    use approx::assert_relative_eq;

    #[test]
    fn test_repeated_pair_overwrites() {
        let table: DemandTable = [("A", "D", 100.0), ("B", "C", 50.0), ("A", "D", 300.0)]
            .into_iter()
            .collect();
        assert_eq!(2, table.len());
        assert_eq!(Some(300.0), table.get("A", "D"));
        assert_eq!("A", table.pairs()[0].origin());
    }

    #[test]
    fn test_total_ignores_non_positive_demand() {
        let table: DemandTable = [("A", "D", 100.0), ("B", "C", -5.0), ("C", "B", 0.0)]
            .into_iter()
            .collect();
        assert_relative_eq!(100.0, table.total());
    }

    #[test]
    fn test_resolve_skips_unknown_and_empty_pairs() {
        let graph = diamond();
        let table: DemandTable = [
            ("A", "D", 100.0),
            ("A", "X", 40.0),
            ("B", "C", 0.0),
            ("C", "B", 25.0),
        ]
        .into_iter()
        .collect();
        let resolved = table.resolve(&graph);
        assert_eq!(2, resolved.len());
        assert_eq!(NodeId(0), resolved[0].origin);
        assert_eq!(NodeId(3), resolved[0].destination);
        assert_eq!(NodeId(2), resolved[1].origin);
        assert_eq!(3, resolved[1].pair);
    }
}
