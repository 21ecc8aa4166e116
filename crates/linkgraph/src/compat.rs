//! Type compatibility for auto-linking orphan nodes.
//!
//! An orphan can only be proposed for linking to nodes whose type appears in
//! its compatibility list. The table is plain data so callers can substitute
//! their own.

use crate::graph::{LinkGraph, NodeType};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which node types each node type may link to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCompatibility {
    rules: HashMap<NodeType, Vec<NodeType>>,
}

impl Default for TypeCompatibility {
    fn default() -> Self {
        use NodeType::*;
        Self::from_rules([
            (Requirement, vec![Epic, UserStory, Task, Diagram, Test, Feature, Screen, Api]),
            (Epic, vec![Requirement, UserStory, Feature]),
            (UserStory, vec![Requirement, Epic, Task, Screen, UserFlow, Test, Feature]),
            (Task, vec![Requirement, UserStory, Feature, Api, Component]),
            (Diagram, vec![Requirement, UserStory, Entity, UserFlow, Api]),
            (Test, vec![Requirement, UserStory, Feature]),
            (Entity, vec![Requirement, Api, Diagram]),
            (Feature, vec![Requirement, Epic, UserStory, Task]),
            (Persona, vec![UserFlow, UserStory]),
            (UserFlow, vec![Persona, Screen, UserStory]),
            (Screen, vec![UserStory, UserFlow, Component, Requirement]),
            (Component, vec![Screen, Task]),
            (Api, vec![Requirement, Entity, Task]),
            (TechStack, vec![Requirement, Component, Api]),
        ])
    }
}

impl TypeCompatibility {
    /// A table with no rules: nothing is compatible with anything.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Build a table from `(type, compatible types)` pairs.
    pub fn from_rules(rules: impl IntoIterator<Item = (NodeType, Vec<NodeType>)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Types that `node_type` may link to.
    pub fn compatible_with(&self, node_type: NodeType) -> &[NodeType] {
        self.rules.get(&node_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `from` may link to `to`.
    pub fn allows(&self, from: NodeType, to: NodeType) -> bool {
        self.compatible_with(from).contains(&to)
    }
}

/// A proposed new link for an orphan node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    /// The orphan the link starts from
    pub source_id: String,
    /// Compatible node to link to
    pub target_id: String,
    /// Proposed edge type, `{source type}_{target type}`
    pub link_type: String,
}

/// Compatible link targets for `orphan_id`, ordered by ID and capped at `limit`.
///
/// Entries stored under a secondary ID are skipped so each record is offered
/// once. An unknown `orphan_id` yields no candidates.
pub fn auto_link_candidates(
    graph: &LinkGraph,
    orphan_id: &str,
    table: &TypeCompatibility,
    limit: usize,
) -> Vec<LinkCandidate> {
    let Some(orphan) = graph.get_node(orphan_id) else {
        return Vec::new();
    };

    let mut candidates: Vec<LinkCandidate> = graph
        .nodes()
        .filter(|(stored_id, node)| {
            *stored_id == node.id
                && node.id != orphan.id
                && table.allows(orphan.node_type, node.node_type)
        })
        .map(|(_, node)| LinkCandidate {
            source_id: orphan_id.to_string(),
            target_id: node.id.clone(),
            link_type: format!("{}_{}", orphan.node_type, node.node_type),
        })
        .collect();

    candidates.sort_by(|a, b| a.target_id.cmp(&b.target_id));
    candidates.truncate(limit);
    debug!(
        "{} auto-link candidates for orphan {orphan_id}",
        candidates.len()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    fn sample() -> LinkGraph {
        let mut graph = LinkGraph::new();
        graph.add_node(Node::new("PERSONA-0", NodeType::Persona, "Admin"));
        graph.add_node(Node::new("FLOW-2", NodeType::UserFlow, "Checkout"));
        graph.add_node(Node::new("FLOW-1", NodeType::UserFlow, "Signup"));
        graph.add_node(Node::new("TASK-1", NodeType::Task, "Deploy"));
        graph
    }

    #[test]
    fn test_candidates_follow_table() {
        let graph = sample();
        let found =
            auto_link_candidates(&graph, "PERSONA-0", &TypeCompatibility::default(), 10);
        let targets: Vec<&str> = found.iter().map(|c| c.target_id.as_str()).collect();
        assert_eq!(targets, vec!["FLOW-1", "FLOW-2"]);
        assert_eq!(found[0].link_type, "persona_user-flow");
    }

    #[test]
    fn test_limit_and_unknown_orphan() {
        let graph = sample();
        let table = TypeCompatibility::default();
        assert_eq!(auto_link_candidates(&graph, "PERSONA-0", &table, 1).len(), 1);
        assert!(auto_link_candidates(&graph, "NOPE", &table, 10).is_empty());
    }

    #[test]
    fn test_substituted_table() {
        let graph = sample();
        let table = TypeCompatibility::from_rules([(NodeType::Persona, vec![NodeType::Task])]);
        let found = auto_link_candidates(&graph, "PERSONA-0", &table, 10);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target_id, "TASK-1");
        assert!(auto_link_candidates(&graph, "PERSONA-0", &TypeCompatibility::empty(), 10)
            .is_empty());
    }
}
