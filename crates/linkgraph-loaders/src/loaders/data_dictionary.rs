//! Data dictionary entities. Entities carry no links of their own.

use crate::errors::{LoaderError, LoaderResult};
use crate::record::{str_field, synthetic_id};
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeType};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Loads entity nodes from `{"entities": [...]}` or `{"entities": {"Name": {...}}}`
pub struct DataDictionaryLoader {
    file: String,
}

impl DataDictionaryLoader {
    /// Loader for `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Add every entity of an already parsed document to the graph
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        let entities = value
            .as_object()
            .and_then(|root| root.get("entities"))
            .ok_or_else(|| {
                LoaderError::InvalidShape(path.to_path_buf(), "missing \"entities\"".to_string())
            })?;

        match entities {
            Value::Array(items) => {
                for entity in items.iter().filter_map(Value::as_object) {
                    let name = str_field(entity, &["name", "title"]);
                    add_entity(entity, name, graph);
                }
            }
            Value::Object(by_name) => {
                for (name, entity) in by_name {
                    if let Some(entity) = entity.as_object() {
                        add_entity(entity, Some(name.clone()), graph);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn add_entity(entity: &Map<String, Value>, name: Option<String>, graph: &mut LinkGraph) {
    let id = str_field(entity, &["id"]).unwrap_or_else(|| synthetic_id(NodeType::Entity, graph));
    let title = name.unwrap_or_else(|| id.clone());
    let node = Node::new(&id, NodeType::Entity, title)
        .with_description(str_field(entity, &["description"]).unwrap_or_default())
        .with_data(entity.clone());
    graph.add_node(node);
}

impl ArtifactLoader for DataDictionaryLoader {
    fn name(&self) -> &str {
        "data_dictionary"
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
