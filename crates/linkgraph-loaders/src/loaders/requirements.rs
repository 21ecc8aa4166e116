//! Requirement records from a mapping-of-ID-to-record JSON file.
//!
//! ```json
//! {"requirements": {"REQ-001": {"title": "...", "dependencies": ["REQ-002"]}}}
//! ```
//!
//! When the configured top-level key is absent the whole object is taken as
//! the mapping.

use crate::errors::{LoaderError, LoaderResult};
use crate::record::{id_list, str_field};
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeDetails, NodeType};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Loads requirement nodes and their parent/dependency/conflict/related edges
pub struct RequirementsLoader {
    file: String,
    key: String,
}

impl RequirementsLoader {
    /// Loader for `file`, reading the mapping under `key`
    pub fn new(file: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            key: key.into(),
        }
    }

    /// Add every record of an already parsed document to the graph
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        let mapping = requirement_mapping(value, &self.key).ok_or_else(|| {
            LoaderError::InvalidShape(path.to_path_buf(), "expected a JSON object".to_string())
        })?;

        for (id, record) in mapping {
            let Some(record) = record.as_object() else {
                continue;
            };
            load_record(id, record, graph);
        }
        Ok(())
    }
}

/// The requirement mapping inside a parsed requirements document.
pub fn requirement_mapping<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    let root = value.as_object()?;
    match root.get(key) {
        Some(inner) => inner.as_object(),
        None => Some(root),
    }
}

fn load_record(id: &str, record: &Map<String, Value>, graph: &mut LinkGraph) {
    let node = Node::new(
        id,
        NodeType::Requirement,
        str_field(record, &["title", "name"]).unwrap_or_else(|| id.to_string()),
    )
    .with_description(str_field(record, &["description", "text"]).unwrap_or_default())
    .with_details(NodeDetails::Requirement {
        requirement_id: str_field(record, &["requirement_id"]),
        priority: str_field(record, &["priority"]),
        status: str_field(record, &["status"]),
    })
    .with_data(record.clone());
    graph.add_node(node);

    if let Some(parent) = str_field(record, &["parent_requirement"]) {
        graph.add_edge(id, &parent, "parent");
    }
    for target in id_list(record, &["dependencies"]) {
        graph.add_edge(id, &target, "dependency");
    }
    for target in id_list(record, &["conflicts"]) {
        graph.add_edge(id, &target, "conflict");
    }
    for target in id_list(record, &["related_requirements"]) {
        graph.add_edge(id, &target, "related");
    }
}

impl ArtifactLoader for RequirementsLoader {
    fn name(&self) -> &str {
        "requirements"
    }

    fn load(&self, ctx: &LoadContext, graph: &mut LinkGraph) -> LoaderResult<SourceStatus> {
        load_json_file(ctx, &ctx.path(&self.file), graph, |path, value, graph| {
            self.load_value(path, value, graph)
        })
    }

    fn sources(&self, ctx: &LoadContext) -> Vec<PathBuf> {
        vec![ctx.path(&self.file)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: Value) -> LinkGraph {
        let mut graph = LinkGraph::new();
        RequirementsLoader::new("requirements.json", "requirements")
            .load_value(Path::new("requirements.json"), &value, &mut graph)
            .unwrap();
        graph
    }

    #[test]
    fn test_dependency_scenario() {
        let graph = load(json!({"R1": {}, "R2": {"dependencies": ["R1"]}}));
        assert!(graph.contains_node("R1"));
        assert!(graph.contains_node("R2"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.get_link_type("R2", "R1").as_deref(), Some("dependency"));
        assert!(graph.get_orphan_nodes().is_empty());
        assert_eq!(graph.get_linked_nodes("R1", 1, None), vec!["R2".to_string()]);
    }

    #[test]
    fn test_all_edge_kinds_under_key() {
        let graph = load(json!({"requirements": {
            "REQ-002": {
                "title": "Reset password",
                "parent_requirement": "REQ-001",
                "conflicts": ["REQ-009"],
                "related_requirements": ["REQ-010"]
            }
        }}));
        assert_eq!(graph.get_node("REQ-002").unwrap().title, "Reset password");
        assert_eq!(graph.get_link_type("REQ-002", "REQ-001").as_deref(), Some("parent"));
        assert_eq!(graph.get_link_type("REQ-002", "REQ-009").as_deref(), Some("conflict"));
        assert_eq!(graph.get_link_type("REQ-002", "REQ-010").as_deref(), Some("related"));
    }

    #[test]
    fn test_secondary_requirement_id() {
        let graph = load(json!({"requirements": {
            "j-17": {"requirement_id": "REQ-017", "title": "Export"}
        }}));
        assert_eq!(graph.get_node("REQ-017").unwrap().id, "j-17");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_non_object_records_skipped() {
        let graph = load(json!({"requirements": {"R1": "oops", "R2": {}}}));
        assert!(!graph.contains_node("R1"));
        assert!(graph.contains_node("R2"));
    }

    #[test]
    fn test_non_object_document_is_invalid() {
        let mut graph = LinkGraph::new();
        let err = RequirementsLoader::new("r.json", "requirements")
            .load_value(Path::new("r.json"), &json!([1, 2]), &mut graph)
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidShape(..)));
    }
}
