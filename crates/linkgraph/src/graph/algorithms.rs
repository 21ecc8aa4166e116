//! Traversal and orphan analysis.
//!
//! Traversal treats the graph as undirected: at every hop both successors and
//! predecessors are candidates. Edge types keep their direction only for
//! filtering and for [`LinkGraph::get_link_type`].

use super::linkgraph::LinkGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A node reached from a changed node, with how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationTarget {
    /// The changed node the traversal started from
    pub changed_id: String,
    /// The linked node that may need updating
    pub node_id: String,
    /// Direct link type between the two, if they are adjacent
    pub link_type: Option<String>,
    /// Hop distance from `changed_id`
    pub distance: usize,
}

/// Bounded breadth-first search from `start`.
///
/// Returns `(id, hops)` in discovery order, excluding `start`. Nodes exactly
/// `depth` hops away are included but not expanded. With a filter, a neighbour
/// is only enqueued if some edge between it and the current node, in the
/// direction it is stored, has a type in the filter.
pub fn bounded_bfs(
    graph: &LinkGraph,
    start: &str,
    depth: usize,
    edge_filter: Option<&[&str]>,
) -> Vec<(String, usize)> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(start.to_string());
    queue.push_back((start.to_string(), 0));

    while let Some((current, hops)) = queue.pop_front() {
        if hops >= depth {
            continue;
        }

        for neighbor in neighbors(graph, &current, edge_filter) {
            if visited.insert(neighbor.clone()) {
                result.push((neighbor.clone(), hops + 1));
                queue.push_back((neighbor, hops + 1));
            }
        }
    }

    result
}

/// Qualifying neighbours of `current`, successors first, each group sorted.
fn neighbors(graph: &LinkGraph, current: &str, edge_filter: Option<&[&str]>) -> Vec<String> {
    let allowed = |source: &str, target: &str| match edge_filter {
        None => true,
        Some(types) => graph
            .edge_types_between(source, target)
            .iter()
            .any(|ty| types.contains(&ty.as_str())),
    };

    let mut outgoing: Vec<&str> = graph
        .successors(current)
        .filter(|next| allowed(current, *next))
        .collect();
    outgoing.sort_unstable();

    let mut incoming: Vec<&str> = graph
        .predecessors(current)
        .filter(|prev| allowed(*prev, current))
        .collect();
    incoming.sort_unstable();

    outgoing
        .into_iter()
        .chain(incoming)
        .map(str::to_string)
        .collect()
}

/// IDs of nodes that are not an endpoint of any edge.
pub fn orphan_nodes(graph: &LinkGraph) -> Vec<String> {
    let linked: HashSet<&str> = graph
        .edges()
        .iter()
        .flat_map(|edge| [edge.source.as_str(), edge.target.as_str()])
        .collect();

    graph
        .nodes()
        .map(|(id, _)| id)
        .filter(|id| !linked.contains(id))
        .map(str::to_string)
        .collect()
}

/// Linked nodes of every changed ID within `depth` hops.
///
/// A node reached from several changed IDs is reported once, for the first
/// changed ID in input order. Changed IDs are never reported as targets.
pub fn propagation_targets(
    graph: &LinkGraph,
    changed_ids: &[String],
    depth: usize,
    edge_filter: Option<&[&str]>,
) -> Vec<PropagationTarget> {
    let changed: HashSet<&str> = changed_ids.iter().map(String::as_str).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut targets: Vec<PropagationTarget> = Vec::new();

    for changed_id in changed_ids {
        for (node_id, distance) in bounded_bfs(graph, changed_id, depth, edge_filter) {
            if changed.contains(node_id.as_str()) || seen.contains(&node_id) {
                continue;
            }
            seen.insert(node_id.clone());
            targets.push(PropagationTarget {
                changed_id: changed_id.clone(),
                link_type: graph.get_link_type(changed_id, &node_id),
                node_id,
                distance,
            });
        }
    }

    targets
}

impl LinkGraph {
    /// Nodes within `depth` hops of `id`, in BFS discovery order.
    ///
    /// `depth == 0` yields nothing; `id` itself is never included. Callers
    /// should treat the result as a set.
    pub fn get_linked_nodes(
        &self,
        id: &str,
        depth: usize,
        edge_filter: Option<&[&str]>,
    ) -> Vec<String> {
        bounded_bfs(self, id, depth, edge_filter)
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// Like [`LinkGraph::get_linked_nodes`], with the hop distance of each node.
    pub fn linked_nodes_with_depth(
        &self,
        id: &str,
        depth: usize,
        edge_filter: Option<&[&str]>,
    ) -> Vec<(String, usize)> {
        bounded_bfs(self, id, depth, edge_filter)
    }

    /// IDs of nodes with no edge in either direction. Order is unspecified.
    pub fn get_orphan_nodes(&self) -> Vec<String> {
        orphan_nodes(self)
    }

    /// Nodes that may need updating after `changed_ids` were edited.
    pub fn propagation_targets(
        &self,
        changed_ids: &[String],
        depth: usize,
        edge_filter: Option<&[&str]>,
    ) -> Vec<PropagationTarget> {
        propagation_targets(self, changed_ids, depth, edge_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{Node, NodeType};

    fn chain() -> LinkGraph {
        // A -> B -> C -> D
        let mut graph = LinkGraph::new();
        for id in ["A", "B", "C", "D"] {
            graph.add_node(Node::new(id, NodeType::Task, id));
        }
        graph.add_edge("A", "B", "task_dependency");
        graph.add_edge("B", "C", "task_dependency");
        graph.add_edge("C", "D", "task_blocks");
        graph
    }

    #[test]
    fn test_depth_zero_is_empty() {
        assert!(chain().get_linked_nodes("A", 0, None).is_empty());
    }

    #[test]
    fn test_depths_are_reported() {
        let graph = chain();
        let found = graph.linked_nodes_with_depth("A", 3, None);
        assert_eq!(
            found,
            vec![("B".to_string(), 1), ("C".to_string(), 2), ("D".to_string(), 3)]
        );
    }

    #[test]
    fn test_filter_stops_at_other_types() {
        let graph = chain();
        let found = graph.get_linked_nodes("A", 5, Some(&["task_dependency"][..]));
        assert_eq!(found, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = chain();
        graph.add_edge("D", "A", "task_dependency");
        let found: HashSet<String> = graph.get_linked_nodes("A", 10, None).into_iter().collect();
        assert_eq!(found.len(), 3);
        assert!(!found.contains("A"));
    }

    #[test]
    fn test_propagation_merges_duplicates() {
        let graph = chain();
        let changed = vec!["B".to_string(), "C".to_string()];
        let targets = graph.propagation_targets(&changed, 1, None);
        let ids: Vec<&str> = targets.iter().map(|t| t.node_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "D"]);
        assert_eq!(targets[0].changed_id, "B");
        assert_eq!(targets[0].link_type.as_deref(), Some("reverse_task_dependency"));
        assert_eq!(targets[1].changed_id, "C");
        assert_eq!(targets[1].link_type.as_deref(), Some("task_blocks"));
    }

    #[test]
    fn test_multi_hop_target_has_no_direct_type() {
        let graph = chain();
        let targets = graph.propagation_targets(&["A".to_string()], 2, None);
        let c = targets.iter().find(|t| t.node_id == "C").unwrap();
        assert_eq!(c.distance, 2);
        assert_eq!(c.link_type, None);
    }
}
