pub mod error;
pub mod graph;
pub mod link;
pub mod node;
pub mod path;

#[cfg(test)]
pub mod fixtures;
