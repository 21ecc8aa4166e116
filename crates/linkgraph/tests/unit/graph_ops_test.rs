//! Tests for core store operations (add_node, add_edge, update_node, orphans).

use linkgraph::{GraphError, LinkGraph, LinkMap, Node, NodePatch, NodeType};
use std::collections::HashSet;

fn node(id: &str, node_type: NodeType) -> Node {
    Node::new(id, node_type, format!("{id} title"))
}

fn as_set(ids: Vec<String>) -> HashSet<String> {
    ids.into_iter().collect()
}

#[test]
fn test_add_edge_repeated_yields_one_edge() {
    let mut graph = LinkGraph::new();
    for _ in 0..10 {
        graph.add_edge("TASK-1", "TASK-2", "task_dependency");
    }
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.successors("TASK-1").count(), 1);
    assert_eq!(graph.predecessors("TASK-2").count(), 1);
}

#[test]
fn test_edge_before_nodes_exist() {
    let mut graph = LinkGraph::new();
    assert!(graph.add_edge("US-1", "REQ-9", "story_requirement"));
    assert!(graph.get_node("US-1").is_none());
    assert_eq!(graph.get_linked_nodes("US-1", 1, None), vec!["REQ-9".to_string()]);
}

#[test]
fn test_get_missing_node_is_none() {
    let graph = LinkGraph::new();
    assert!(graph.get_node("REQ-404").is_none());
}

#[test]
fn test_orphans_are_nodes_without_edges() {
    let mut graph = LinkGraph::new();
    graph.add_node(node("REQ-1", NodeType::Requirement));
    graph.add_node(node("REQ-2", NodeType::Requirement));
    graph.add_node(node("DIAG-1", NodeType::Diagram));

    assert_eq!(
        as_set(graph.get_orphan_nodes()),
        as_set(vec!["REQ-1".into(), "REQ-2".into(), "DIAG-1".into()])
    );

    graph.add_edge("REQ-2", "REQ-1", "dependency");
    assert_eq!(graph.get_orphan_nodes(), vec!["DIAG-1".to_string()]);

    // A node that is only an edge target is not an orphan either
    graph.add_edge("TASK-5", "DIAG-1", "task_requirement");
    assert!(graph.get_orphan_nodes().is_empty());
}

#[test]
fn test_update_replaces_outgoing_edges_only() {
    let mut graph = LinkGraph::new();
    for id in ["X", "Y", "Z", "W"] {
        graph.add_node(node(id, NodeType::Task));
    }
    graph.add_edge("X", "Z", "t");
    graph.add_edge("X", "Z", "u");
    graph.add_edge("W", "X", "t");

    let links = LinkMap::from([("t".to_string(), vec!["Y".to_string()])]);
    graph
        .update_node("X", NodePatch::new().description("changed"), Some(&links))
        .unwrap();

    let edges: Vec<(String, String, String)> = graph
        .edges()
        .iter()
        .map(|e| (e.source.clone(), e.target.clone(), e.edge_type.clone()))
        .collect();
    assert!(!edges.iter().any(|(s, t, _)| s == "X" && t == "Z"));
    assert!(edges.contains(&("X".into(), "Y".into(), "t".into())));
    assert!(edges.contains(&("W".into(), "X".into(), "t".into())));
    assert_eq!(graph.get_link_type("X", "Z"), None);
    assert_eq!(graph.get_node("X").unwrap().description, "changed");
    assert_eq!(graph.get_node("X").unwrap().title, "X title");
}

#[test]
fn test_update_leaves_dangling_reverse_adjacency() {
    let mut graph = LinkGraph::new();
    graph.add_edge("X", "Z", "t");
    graph
        .update_node(
            "X",
            NodePatch::new().node_type(NodeType::Task),
            Some(&LinkMap::new()),
        )
        .unwrap();

    assert_eq!(graph.edge_count(), 0);
    // Z still lists X as a predecessor after the forward edge is gone
    assert_eq!(graph.predecessors("Z").collect::<Vec<_>>(), vec!["X"]);
    assert_eq!(graph.get_linked_nodes("Z", 1, None), vec!["X".to_string()]);
    assert!(graph.get_linked_nodes("Z", 1, Some(&["t"][..])).is_empty());
    assert!(graph.get_linked_nodes("X", 1, None).is_empty());
}

#[test]
fn test_update_without_links_keeps_edges() {
    let mut graph = LinkGraph::new();
    graph.add_node(node("X", NodeType::Task));
    graph.add_edge("X", "Z", "t");
    graph
        .update_node("X", NodePatch::new().data("status", "done"), None)
        .unwrap();
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        graph.get_node("X").unwrap().data.get("status"),
        Some(&serde_json::Value::from("done"))
    );
}

#[test]
fn test_update_inserts_typed_absent_node() {
    let mut graph = LinkGraph::new();
    graph
        .update_node(
            "API-1",
            NodePatch::new().node_type(NodeType::Api).title("Orders API"),
            None,
        )
        .unwrap();
    assert_eq!(graph.get_node("API-1").unwrap().title, "Orders API");

    let err = graph.update_node("API-2", NodePatch::new(), None).unwrap_err();
    assert!(matches!(err, GraphError::InvalidOperation { .. }));
}
