//! Tests for bounded traversal and link-type lookup.

use linkgraph::{LinkGraph, Node, NodeType};
use std::collections::HashSet;

fn as_set(ids: Vec<String>) -> HashSet<String> {
    ids.into_iter().collect()
}

// R2 -> R1 (dependency), US-1 -> R1 (story_requirement), TASK-1 -> US-1, TASK-2 -> TASK-1
fn project() -> LinkGraph {
    let mut graph = LinkGraph::new();
    graph.add_node(Node::new("R1", NodeType::Requirement, "Login"));
    graph.add_node(Node::new("R2", NodeType::Requirement, "Session"));
    graph.add_node(Node::new("US-1", NodeType::UserStory, "As a user I log in"));
    graph.add_node(Node::new("TASK-1", NodeType::Task, "Form"));
    graph.add_node(Node::new("TASK-2", NodeType::Task, "Styling"));
    graph.add_edge("R2", "R1", "dependency");
    graph.add_edge("US-1", "R1", "story_requirement");
    graph.add_edge("TASK-1", "US-1", "task_story");
    graph.add_edge("TASK-2", "TASK-1", "task_dependency");
    graph
}

#[test]
fn test_depth_one_is_direct_neighbours() {
    let graph = project();
    assert_eq!(
        as_set(graph.get_linked_nodes("R1", 1, None)),
        as_set(vec!["R2".into(), "US-1".into()])
    );
    assert_eq!(
        as_set(graph.get_linked_nodes("US-1", 1, None)),
        as_set(vec!["R1".into(), "TASK-1".into()])
    );
}

#[test]
fn test_depth_zero_returns_nothing() {
    assert!(project().get_linked_nodes("R1", 0, None).is_empty());
}

#[test]
fn test_deeper_traversal_excludes_start() {
    let graph = project();
    let found = as_set(graph.get_linked_nodes("R1", 3, None));
    assert_eq!(
        found,
        as_set(vec!["R2".into(), "US-1".into(), "TASK-1".into(), "TASK-2".into()])
    );
    assert!(!found.contains("R1"));

    let two_hops = as_set(graph.get_linked_nodes("R1", 2, None));
    assert!(two_hops.contains("TASK-1"));
    assert!(!two_hops.contains("TASK-2"));
}

#[test]
fn test_traversal_is_symmetric_but_types_are_not() {
    let graph = project();
    assert!(graph.get_linked_nodes("R2", 1, None).contains(&"R1".to_string()));
    assert!(graph.get_linked_nodes("R1", 1, None).contains(&"R2".to_string()));
    assert_eq!(graph.get_link_type("R2", "R1").as_deref(), Some("dependency"));
    assert_eq!(
        graph.get_link_type("R1", "R2").as_deref(),
        Some("reverse_dependency")
    );
}

#[test]
fn test_filter_applies_at_expansion() {
    let graph = project();
    let found = graph.get_linked_nodes("R1", 3, Some(&["story_requirement", "task_story"][..]));
    assert_eq!(
        as_set(found),
        as_set(vec!["US-1".into(), "TASK-1".into()])
    );
}

#[test]
fn test_one_qualifying_edge_is_enough() {
    let mut graph = project();
    graph.add_edge("R1", "R2", "conflict");
    let found = graph.get_linked_nodes("R1", 1, Some(&["conflict"][..]));
    assert_eq!(found, vec!["R2".to_string()]);
}

#[test]
fn test_unknown_start_is_empty() {
    assert!(project().get_linked_nodes("NOPE", 4, None).is_empty());
}
