//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`Node`]: an artifact with typed details and its source record
//! - [`Edge`]: a typed, directed relationship between two IDs
//! - [`LinkGraph`]: the store with adjacency indexes
//! - [`algorithms`]: bounded traversal, orphans, propagation targets

mod linkgraph;
mod stats;
mod types;
pub mod algorithms;

pub use algorithms::PropagationTarget;
pub use linkgraph::{LinkGraph, LinkMap, REVERSE_PREFIX};
pub use stats::GraphStatistics;
pub use types::{Edge, Node, NodeDetails, NodePatch, NodeType};
