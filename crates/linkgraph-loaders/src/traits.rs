use crate::errors::LoaderResult;
use linkgraph::LinkGraph;
use std::path::{Path, PathBuf};

/// Context handed to every loader during a build
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// Project root directory
    pub root: PathBuf,

    /// Maximum file size to read (in bytes)
    pub max_file_size: usize,
}

impl LoadContext {
    /// Create a context for `root`
    pub fn new(root: impl Into<PathBuf>, max_file_size: usize) -> Self {
        Self {
            root: root.into(),
            max_file_size,
        }
    }

    /// Resolve a layout entry against the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// Whether a loader found its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// Source present and loaded
    Loaded,
    /// Source absent; nothing was added
    Missing,
}

/// Core trait every artifact loader implements
///
/// A loader reads one artifact format and only calls graph store operations;
/// it never traverses. Loaders run one at a time against the same graph.
pub trait ArtifactLoader: Send + Sync {
    /// Short name used in logs and diagnostics
    fn name(&self) -> &str;

    /// Load the loader's source into `graph`
    ///
    /// # Errors
    /// Returns `LoaderError` if the source exists but cannot be read or parsed.
    /// What was added before the failure stays in the graph.
    fn load(&self, ctx: &LoadContext, graph: &mut LinkGraph) -> LoaderResult<SourceStatus>;

    /// Files this loader reads, for logging
    fn sources(&self, ctx: &LoadContext) -> Vec<PathBuf>;
}

/// Convenience for loaders of a single JSON file
pub(crate) fn load_json_file(
    ctx: &LoadContext,
    path: &Path,
    graph: &mut LinkGraph,
    apply: impl FnOnce(&Path, &serde_json::Value, &mut LinkGraph) -> LoaderResult<()>,
) -> LoaderResult<SourceStatus> {
    match crate::source::read_json(path, ctx.max_file_size)? {
        Some(value) => {
            apply(path, &value, graph)?;
            Ok(SourceStatus::Loaded)
        }
        None => Ok(SourceStatus::Missing),
    }
}
