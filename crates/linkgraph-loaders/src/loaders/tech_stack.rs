//! Tech stack descriptor, loaded as a single node.

use crate::errors::{LoaderError, LoaderResult};
use crate::record::str_field;
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeType};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// ID of the tech stack node.
pub const TECH_STACK_ID: &str = "TECH-STACK";

/// Loads the tech stack descriptor
pub struct TechStackLoader {
    file: String,
}

impl TechStackLoader {
    /// Loader for `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Store the whole descriptor under [`TECH_STACK_ID`]
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        let root = value.as_object().ok_or_else(|| {
            LoaderError::InvalidShape(path.to_path_buf(), "expected a JSON object".to_string())
        })?;

        let node = Node::new(
            TECH_STACK_ID,
            NodeType::TechStack,
            str_field(root, &["name", "title"]).unwrap_or_else(|| "Tech Stack".to_string()),
        )
        .with_description(str_field(root, &["description", "summary"]).unwrap_or_default())
        .with_data(root.clone());
        graph.add_node(node);
        Ok(())
    }
}

impl ArtifactLoader for TechStackLoader {
    fn name(&self) -> &str {
        "tech_stack"
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
