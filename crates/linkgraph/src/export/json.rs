//! JSON export of the link graph.
//!
//! Produces `{"nodes": [...], "edges": [...]}`. Nodes are sorted by stored ID;
//! edges keep insertion order so repeated exports of the same build match.

use crate::error::{GraphError, Result};
use crate::graph::LinkGraph;
use serde_json::{json, Value};

/// Export the graph as a JSON value.
pub fn export_value(graph: &LinkGraph) -> Value {
    let mut entries: Vec<_> = graph.nodes().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let nodes: Vec<Value> = entries
        .into_iter()
        .map(|(stored_id, node)| {
            json!({
                "id": stored_id,
                "title": node.title,
                "type": node.node_type.as_str(),
                "description": node.description,
                "data": node.data,
            })
        })
        .collect();

    let edges: Vec<Value> = graph
        .edges()
        .iter()
        .map(|edge| {
            json!({
                "source": edge.source,
                "target": edge.target,
                "type": edge.edge_type,
            })
        })
        .collect();

    json!({
        "nodes": nodes,
        "edges": edges,
    })
}

/// Export the graph as pretty-printed JSON.
pub fn export_json(graph: &LinkGraph) -> Result<String> {
    serde_json::to_string_pretty(&export_value(graph))
        .map_err(|e| GraphError::serialization("Failed to serialize graph", Some(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, NodeType};

    #[test]
    fn test_export_shape() {
        let mut graph = LinkGraph::new();
        graph.add_node(Node::new("REQ-2", NodeType::Requirement, "B"));
        graph.add_node(Node::new("REQ-1", NodeType::Requirement, "A"));
        graph.add_edge("REQ-2", "REQ-1", "dependency");

        let value = export_value(&graph);
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["id"], "REQ-1");
        assert_eq!(nodes[1]["type"], "requirement");
        assert_eq!(value["edges"][0]["type"], "dependency");

        let text = export_json(&graph).unwrap();
        assert!(text.contains("\"dependency\""));
    }
}
