//! Work breakdown / feature list.

use crate::errors::{LoaderError, LoaderResult};
use crate::record::{id_list, objects, record_id, str_field};
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeDetails, NodeType};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Loads feature nodes with their story and requirement links
pub struct WorkBreakdownLoader {
    file: String,
}

impl WorkBreakdownLoader {
    /// Loader for `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Add every feature of an already parsed document to the graph
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        let features = match value {
            Value::Array(_) => Some(value),
            Value::Object(root) => root.get("features"),
            _ => None,
        }
        .ok_or_else(|| {
            LoaderError::InvalidShape(path.to_path_buf(), "missing \"features\"".to_string())
        })?;

        for feature in objects(Some(features)) {
            add_feature(feature, graph);
        }
        Ok(())
    }
}

fn add_feature(feature: &Map<String, Value>, graph: &mut LinkGraph) {
    let id = record_id(feature, NodeType::Feature, graph);
    let story_ids = id_list(feature, &["user_stories", "story_ids", "stories"]);
    let requirement_ids = id_list(feature, &["requirements", "requirement_ids", "requirement_id"]);

    let node = Node::new(
        &id,
        NodeType::Feature,
        str_field(feature, &["name", "title"]).unwrap_or_else(|| id.clone()),
    )
    .with_description(str_field(feature, &["description"]).unwrap_or_default())
    .with_details(NodeDetails::Feature {
        story_ids: story_ids.clone(),
        requirement_ids: requirement_ids.clone(),
    })
    .with_data(feature.clone());
    graph.add_node(node);

    for story in &story_ids {
        graph.add_edge(&id, story, "feature_story");
    }
    for req in &requirement_ids {
        graph.add_edge(&id, req, "feature_requirement");
    }
}

impl ArtifactLoader for WorkBreakdownLoader {
    fn name(&self) -> &str {
        "work_breakdown"
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

    #[test]
    fn test_feature_links() {
        let mut graph = LinkGraph::new();
        WorkBreakdownLoader::new("work_breakdown.json")
            .load_value(
                Path::new("w.json"),
                &json!({"features": [{"id": "FEAT-1", "name": "Payments",
                                      "user_stories": ["US-1"], "requirements": "REQ-1, REQ-2"}]}),
                &mut graph,
            )
            .unwrap();
        assert_eq!(graph.get_link_type("FEAT-1", "US-1").as_deref(), Some("feature_story"));
        assert_eq!(
            graph.get_link_type("FEAT-1", "REQ-2").as_deref(),
            Some("feature_requirement")
        );
        assert_eq!(graph.edge_count(), 3);
    }
}
