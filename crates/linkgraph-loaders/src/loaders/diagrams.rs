//! One file per diagram, named `{SUBJECT_ID}_{kind}.ext`.

use crate::errors::LoaderResult;
use crate::source::read_text;
use crate::traits::{ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeDetails, NodeType};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Subject ID and diagram kind encoded in a file stem.
///
/// `REQ-099_flowchart` gives `("REQ-099", Some("flowchart"))`; a stem without
/// an underscore is all subject.
pub fn split_stem(stem: &str) -> (&str, Option<&str>) {
    match stem.split_once('_') {
        Some((subject, kind)) => (subject, Some(kind)),
        None => (stem, None),
    }
}

/// Node ID for a diagram file stem.
pub fn diagram_id(stem: &str) -> String {
    format!("{}-{stem}", NodeType::Diagram.synthetic_prefix())
}

/// Loads diagram nodes and links each to its subject when the subject is known
pub struct DiagramsLoader {
    dir: String,
    extensions: Vec<String>,
}

impl DiagramsLoader {
    /// Loader for files in `dir` with one of `extensions`
    pub fn new(dir: impl Into<String>, extensions: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            extensions,
        }
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|wanted| wanted == ext))
            .unwrap_or(false)
    }

    /// Diagram files under the directory, sorted by path
    pub fn diagram_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(false) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.wants(entry.path()) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => warn!(error = %e, "Skipping unreadable diagram entry"),
            }
        }
        files.sort();
        files
    }

    /// Add one diagram to the graph
    pub fn load_diagram(&self, path: &Path, content: &str, graph: &mut LinkGraph) {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        let (subject, kind) = split_stem(stem);
        let id = diagram_id(stem);

        let mut data = Map::new();
        data.insert("file".to_string(), Value::from(path.display().to_string()));
        data.insert("content".to_string(), Value::from(content));

        let node = Node::new(&id, NodeType::Diagram, stem)
            .with_details(NodeDetails::Diagram {
                file: path.display().to_string(),
                diagram_kind: kind.unwrap_or_default().to_string(),
                subject_id: subject.to_string(),
            })
            .with_data(data);
        graph.add_node(node);

        if graph.contains_node(subject) {
            graph.add_edge(&id, subject, "diagram_of");
        }
    }
}

impl ArtifactLoader for DiagramsLoader {
    fn name(&self) -> &str {
        "diagrams"
    }

    fn load(&self, ctx: &LoadContext, graph: &mut LinkGraph) -> LoaderResult<SourceStatus> {
        let dir = ctx.path(&self.dir);
        if !dir.is_dir() {
            return Ok(SourceStatus::Missing);
        }

        for file in self.diagram_files(&dir) {
            // A bad diagram file skips that diagram only
            match read_text(&file, ctx.max_file_size) {
                Ok(Some(content)) => self.load_diagram(&file, &content, graph),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Skipping diagram"),
            }
        }
        Ok(SourceStatus::Loaded)
    }

    fn sources(&self, ctx: &LoadContext) -> Vec<PathBuf> {
        vec![ctx.path(&self.dir)]
    }
}
