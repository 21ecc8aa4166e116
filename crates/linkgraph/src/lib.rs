//! # linkgraph
//!
//! An in-memory relationship graph for cross-referenced project artifacts:
//! requirements, epics, stories, tasks, diagrams and UX/UI specifications.
//!
//! ## Architecture
//!
//! ```text
//! Change resolver (linkgraph-resolver)
//!     ↓ affected IDs
//! Traversal & orphan analysis
//!     ↓
//! Graph store (nodes, edges, adjacency)
//!     ↑
//! Format loaders (linkgraph-loaders)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use linkgraph::{LinkGraph, Node, NodeType};
//!
//! let mut graph = LinkGraph::new();
//! graph.add_node(Node::new("R1", NodeType::Requirement, "Login"));
//! graph.add_node(Node::new("R2", NodeType::Requirement, "Logout"));
//! graph.add_edge("R2", "R1", "dependency");
//!
//! assert_eq!(graph.get_linked_nodes("R1", 1, None), vec!["R2".to_string()]);
//! assert!(graph.get_orphan_nodes().is_empty());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod compat;
pub mod error;
pub mod export;
pub mod graph;

// Re-export main types
pub use compat::{auto_link_candidates, LinkCandidate, TypeCompatibility};
pub use error::{GraphError, Result};
pub use graph::{
    Edge, GraphStatistics, LinkGraph, LinkMap, Node, NodeDetails, NodePatch, NodeType,
    PropagationTarget, REVERSE_PREFIX,
};
