//! Legacy root-level JSON array files.
//!
//! Every object in the array becomes a node of the configured type. Links are
//! inferred from common field names; a document that is an object instead of
//! an array is read from its `items` key.

use crate::config::LegacySource;
use crate::errors::{LoaderError, LoaderResult};
use crate::record::{id_list, objects, record_id, str_field};
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeType};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const STORY_KEYS: &[&str] = &["story_id", "user_story_id", "story_ids", "user_stories"];
const EPIC_KEYS: &[&str] = &["epic_id", "epic_ids"];
const REQUIREMENT_KEYS: &[&str] = &["requirement_id", "requirement_ids", "requirements"];
const FEATURE_KEYS: &[&str] = &["feature_id", "feature_ids"];

/// Loads one legacy array file as nodes of a single type
pub struct GenericArrayLoader {
    source: LegacySource,
}

impl GenericArrayLoader {
    /// Loader for a legacy source entry
    pub fn new(source: LegacySource) -> Self {
        Self { source }
    }

    /// Add every item of an already parsed document to the graph
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        let items = match value {
            Value::Array(_) => Some(value),
            Value::Object(root) => root.get("items"),
            _ => None,
        }
        .filter(|items| items.is_array())
        .ok_or_else(|| {
            LoaderError::InvalidShape(path.to_path_buf(), "expected a JSON array".to_string())
        })?;

        for item in objects(Some(items)) {
            load_item(item, self.source.node_type, graph);
        }
        Ok(())
    }
}

fn load_item(item: &Map<String, Value>, node_type: NodeType, graph: &mut LinkGraph) {
    let id = record_id(item, node_type, graph);
    let node = Node::new(
        &id,
        node_type,
        str_field(item, &["title", "name"]).unwrap_or_else(|| id.clone()),
    )
    .with_description(str_field(item, &["description"]).unwrap_or_default())
    .with_data(item.clone());
    graph.add_node(node);

    let prefix = node_type.as_str();
    let parents = [
        (STORY_KEYS, "story"),
        (EPIC_KEYS, "epic"),
        (REQUIREMENT_KEYS, "requirement"),
        (FEATURE_KEYS, "feature"),
    ];
    for (keys, suffix) in parents {
        let edge_type = format!("{prefix}_{suffix}");
        for target in id_list(item, keys) {
            graph.add_edge(&id, &target, &edge_type);
        }
    }

    if item.get("components").is_some_and(Value::is_array) {
        for component in id_list(item, &["components"]) {
            graph.add_edge(&id, &component, "screen_component");
        }
    }
    if item.get("screens").is_some_and(Value::is_array) {
        for screen in id_list(item, &["screens"]) {
            graph.add_edge(&id, &screen, "flow_screen");
        }
    }
}

impl ArtifactLoader for GenericArrayLoader {
    fn name(&self) -> &str {
        &self.source.file
    }

    fn load(&self, ctx: &LoadContext, graph: &mut LinkGraph) -> LoaderResult<SourceStatus> {
        load_json_file(ctx, &ctx.path(&self.source.file), graph, |path, value, graph| {
            self.load_value(path, value, graph)
        })
    }

    fn sources(&self, ctx: &LoadContext) -> Vec<PathBuf> {
        vec![ctx.path(&self.source.file)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(node_type: NodeType, value: Value) -> LoaderResult<LinkGraph> {
        let mut graph = LinkGraph::new();
        GenericArrayLoader::new(LegacySource::new("legacy.json", node_type)).load_value(
            Path::new("legacy.json"),
            &value,
            &mut graph,
        )?;
        Ok(graph)
    }

    #[test]
    fn test_inferred_edges() {
        let graph = load(
            NodeType::Api,
            json!([{"id": "API-1", "name": "GET /cart", "story_id": "US-1",
                    "epic_id": "EPIC-1", "requirements": ["REQ-1", "REQ-2"], "feature_id": "FEAT-1"}]),
        )
        .unwrap();
        assert_eq!(graph.get_link_type("API-1", "US-1").as_deref(), Some("api_story"));
        assert_eq!(graph.get_link_type("API-1", "EPIC-1").as_deref(), Some("api_epic"));
        assert_eq!(graph.get_link_type("API-1", "REQ-2").as_deref(), Some("api_requirement"));
        assert_eq!(graph.get_link_type("API-1", "FEAT-1").as_deref(), Some("api_feature"));
    }

    #[test]
    fn test_array_fields_add_screen_and_flow_links() {
        let graph = load(
            NodeType::Screen,
            json!({"items": [{"id": "SCREEN-1", "components": ["COMP-1"], "screens": ["SCREEN-2"]},
                             {"id": "SCREEN-3", "components": "COMP-9"}]}),
        )
        .unwrap();
        assert_eq!(graph.get_link_type("SCREEN-1", "COMP-1").as_deref(), Some("screen_component"));
        assert_eq!(graph.get_link_type("SCREEN-1", "SCREEN-2").as_deref(), Some("flow_screen"));
        assert_eq!(graph.get_link_type("SCREEN-3", "COMP-9"), None);
    }

    #[test]
    fn test_synthetic_ids_and_skipped_entries() {
        let graph = load(NodeType::Test, json!([{"name": "login works"}, "junk", {"name": "logout"}]))
            .unwrap();
        assert!(graph.contains_node("TEST-0"));
        assert!(graph.contains_node("TEST-1"));
    }

    #[test]
    fn test_object_without_items_is_rejected() {
        assert!(matches!(
            load(NodeType::Api, json!({"apis": []})),
            Err(LoaderError::InvalidShape(..))
        ));
    }
}
