//! Main LinkGraph interface for graph operations.

use super::types::{Edge, Node, NodePatch};
use crate::error::{GraphError, Result};
use log::{debug, info, trace};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Prefix reported by [`LinkGraph::get_link_type`] when only the opposite edge exists.
pub const REVERSE_PREFIX: &str = "reverse_";

/// Outgoing links for [`LinkGraph::update_node`], keyed by edge type.
pub type LinkMap = BTreeMap<String, Vec<String>>;

/// The in-memory artifact link graph.
///
/// Edges may reference IDs that have no node yet; loaders add edges while
/// scanning and the target may be loaded later, or never.
#[derive(Debug, Default, Clone)]
pub struct LinkGraph {
    nodes: HashMap<String, Node>,
    // Insertion order is kept for stable export
    edges: Vec<Edge>,
    edge_keys: HashSet<(String, String, String)>,
    // Adjacency indexes by node ID
    forward: HashMap<String, HashSet<String>>,
    reverse: HashMap<String, HashSet<String>>,
    // (source, target) -> edge types in insertion order
    edge_types: HashMap<(String, String), Vec<String>>,
    // secondary id -> primary id; the node under a secondary id mirrors the primary
    aliases: HashMap<String, String>,
}

impl LinkGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every node and edge.
    pub fn clear(&mut self) {
        info!(
            "Clearing link graph ({} nodes, {} edges)",
            self.nodes.len(),
            self.edges.len()
        );
        self.nodes.clear();
        self.edges.clear();
        self.edge_keys.clear();
        self.forward.clear();
        self.reverse.clear();
        self.edge_types.clear();
        self.aliases.clear();
    }

    /// Insert or replace a node.
    ///
    /// When the node carries a secondary identifier different from its ID, the
    /// same record is also stored under that identifier.
    pub fn add_node(&mut self, node: Node) {
        debug!("Adding node: id={}, type={}", node.id, node.node_type);
        let id = node.id.clone();
        self.aliases.remove(&id);
        self.nodes.insert(id.clone(), node);
        self.sync_alias(&id);
    }

    /// Primary ID for `id`, following a secondary identifier.
    pub fn resolve_id<'a>(&'a self, id: &'a str) -> &'a str {
        self.aliases.get(id).map_or(id, String::as_str)
    }

    // Mirror the node stored under `primary` to its secondary id, dropping
    // any entry left under a secondary id it no longer carries.
    fn sync_alias(&mut self, primary: &str) {
        let Some(node) = self.nodes.get(primary).cloned() else {
            return;
        };
        let alias = node
            .secondary_id()
            .filter(|alias| *alias != primary)
            .map(str::to_string);

        let stale: Vec<String> = self
            .aliases
            .iter()
            .filter(|(key, target)| target.as_str() == primary && Some(*key) != alias.as_ref())
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            trace!("Dropping secondary id {key} of {primary}");
            self.aliases.remove(&key);
            self.nodes.remove(&key);
        }

        if let Some(alias) = alias {
            trace!("Indexing node {primary} under secondary id {alias}");
            self.nodes.insert(alias.clone(), node);
            self.aliases.insert(alias, primary.to_string());
        }
    }

    /// Add a directed edge unless the exact triple is already present.
    ///
    /// Neither endpoint needs to exist. Returns `true` if the edge was new.
    pub fn add_edge(&mut self, source: &str, target: &str, edge_type: &str) -> bool {
        let key = (source.to_string(), target.to_string(), edge_type.to_string());
        if self.edge_keys.contains(&key) {
            trace!("Edge {source} -> {target} ({edge_type}) already present");
            return false;
        }
        debug!("Adding edge: source={source}, target={target}, type={edge_type}");

        self.forward
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());
        self.reverse
            .entry(target.to_string())
            .or_default()
            .insert(source.to_string());
        self.edge_types
            .entry((source.to_string(), target.to_string()))
            .or_default()
            .push(edge_type.to_string());

        self.edges.push(Edge::new(source, target, edge_type));
        self.edge_keys.insert(key);
        true
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a node by ID, for callers that propagate with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if nothing is stored under `id`.
    pub fn require_node(&self, id: &str) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: id.to_string(),
        })
    }

    /// Whether a node is stored under this ID.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Edge type between `a` and `b`.
    ///
    /// An exact `a -> b` edge wins; otherwise a `b -> a` edge is reported with
    /// the [`REVERSE_PREFIX`]. Returns the first recorded type for the pair.
    pub fn get_link_type(&self, a: &str, b: &str) -> Option<String> {
        if let Some(ty) = self.first_edge_type(a, b) {
            return Some(ty.to_string());
        }
        self.first_edge_type(b, a)
            .map(|ty| format!("{REVERSE_PREFIX}{ty}"))
    }

    /// Merge `patch` into the node stored under `id`, inserting it if absent.
    ///
    /// A secondary identifier addresses the same node: the merge lands on the
    /// primary record and both names read back the result.
    ///
    /// With `new_links`, every outgoing edge of `id` is dropped first and the
    /// given links are added. Incoming edges stay. The reverse adjacency of
    /// former targets is not pruned, so they still list `id` as a neighbour.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidOperation`] if the node is absent and the
    /// patch has no node type.
    pub fn update_node(
        &mut self,
        id: &str,
        patch: NodePatch,
        new_links: Option<&LinkMap>,
    ) -> Result<()> {
        debug!("Updating node: id={id}");
        let primary = self.resolve_id(id).to_string();
        match self.nodes.get_mut(&primary) {
            Some(node) => node.merge(patch),
            None => {
                let node = patch.into_node(id).ok_or_else(|| {
                    GraphError::invalid(format!("cannot insert node {id} without a node type"))
                })?;
                self.nodes.insert(primary.clone(), node);
            }
        }
        self.sync_alias(&primary);

        if let Some(links) = new_links {
            self.remove_outgoing_edges(id);
            for (edge_type, targets) in links {
                for target in targets {
                    self.add_edge(id, target, edge_type);
                }
            }
        }

        Ok(())
    }

    /// Number of stored node entries, secondary-ID copies included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over node entries as `(stored id, node)`.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Targets of edges leaving `id`.
    pub fn successors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.forward
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Sources of edges entering `id`.
    pub fn predecessors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.reverse
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Every edge type recorded for `source -> target`.
    pub fn edge_types_between(&self, source: &str, target: &str) -> &[String] {
        self.edge_types
            .get(&(source.to_string(), target.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn first_edge_type(&self, source: &str, target: &str) -> Option<&str> {
        self.edge_types_between(source, target)
            .first()
            .map(String::as_str)
    }

    fn remove_outgoing_edges(&mut self, id: &str) {
        let before = self.edges.len();
        self.edges.retain(|edge| edge.source != id);
        self.edge_keys.retain(|(source, _, _)| source != id);
        self.edge_types.retain(|(source, _), _| source != id);
        self.forward.remove(id);
        trace!(
            "Removed {} outgoing edges of node {id}",
            before - self.edges.len()
        );
    }
}
