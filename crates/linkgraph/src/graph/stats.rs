//! Graph statistics.

use super::linkgraph::LinkGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node and edge counts grouped by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    /// Stored node entries, secondary-ID copies included
    pub total_nodes: usize,
    /// Edges in the graph
    pub total_edges: usize,
    /// Node entries per node type
    pub nodes_by_type: BTreeMap<String, usize>,
    /// Edges per edge type
    pub edges_by_type: BTreeMap<String, usize>,
    /// Nodes with no edges
    pub orphan_count: usize,
}

impl LinkGraph {
    /// Count nodes and edges by type. The orphan count is recomputed each call.
    pub fn get_statistics(&self) -> GraphStatistics {
        let mut nodes_by_type = BTreeMap::new();
        for (_, node) in self.nodes() {
            *nodes_by_type
                .entry(node.node_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut edges_by_type = BTreeMap::new();
        for edge in self.edges() {
            *edges_by_type.entry(edge.edge_type.clone()).or_insert(0) += 1;
        }

        GraphStatistics {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            nodes_by_type,
            edges_by_type,
            orphan_count: self.get_orphan_nodes().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{LinkGraph, Node, NodeType};

    #[test]
    fn test_statistics_counts() {
        let mut graph = LinkGraph::new();
        graph.add_node(Node::new("EPIC-1", NodeType::Epic, "Onboarding"));
        graph.add_node(Node::new("US-1", NodeType::UserStory, "Sign up"));
        graph.add_node(Node::new("US-2", NodeType::UserStory, "Log in"));
        graph.add_edge("EPIC-1", "US-1", "epic_story");

        let stats = graph.get_statistics();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.total_edges, 1);
        assert_eq!(stats.nodes_by_type.get("user_story"), Some(&2));
        assert_eq!(stats.edges_by_type.get("epic_story"), Some(&1));
        assert_eq!(stats.orphan_count, 1);

        graph.add_edge("EPIC-1", "US-2", "epic_story");
        assert_eq!(graph.get_statistics().orphan_count, 0);
    }
}
