use std::fmt;

use crate::graph::node::NodeId;

/// Structural errors raised while building a [`Graph`](crate::graph::graph::Graph).
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A node with this name is already registered.
    DuplicateKey(String),
    /// A link endpoint or lookup referenced a node that does not exist.
    UnknownNode(String),
}

impl GraphError {
    pub fn unknown_id(id: NodeId) -> Self {
        GraphError::UnknownNode(format!("#{}", id.index()))
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateKey(name) => write!(f, "Node `{name}` is already registered"),
            GraphError::UnknownNode(name) => write!(f, "Unknown node `{name}`"),
        }
    }
}

impl std::error::Error for GraphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offender() {
        let msg = format!("{}", GraphError::DuplicateKey("A".to_string()));
        assert!(msg.contains("`A`"), "got: {msg}");
        let msg = format!("{}", GraphError::unknown_id(NodeId(7)));
        assert!(msg.contains("#7"), "got: {msg}");
    }
}
