//! A graph handle shared between a rebuild task and readers.
//!
//! Rebuilds are single-flight: a second rebuild requested while one is
//! running is refused instead of queued. The new graph is built off-lock and
//! swapped in, so readers see either the old graph or the new one.

use crate::builder::{BuildReport, ProjectGraphBuilder};
use linkgraph::LinkGraph;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};
use tracing::debug;

#[derive(Default)]
struct Inner {
    graph: RwLock<LinkGraph>,
    rebuild: Mutex<()>,
}

/// Cloneable handle to a [`LinkGraph`]
#[derive(Clone, Default)]
pub struct SharedLinkGraph {
    inner: Arc<Inner>,
}

impl SharedLinkGraph {
    /// Wrap an existing graph
    pub fn new(graph: LinkGraph) -> Self {
        Self {
            inner: Arc::new(Inner {
                graph: RwLock::new(graph),
                rebuild: Mutex::new(()),
            }),
        }
    }

    /// Run a read-only query. Queries may run concurrently with each other.
    pub fn read<R>(&self, query: impl FnOnce(&LinkGraph) -> R) -> R {
        let graph = self.inner.graph.read().unwrap_or_else(PoisonError::into_inner);
        query(&graph)
    }

    /// Run an incremental mutation such as `update_node`
    pub fn write<R>(&self, update: impl FnOnce(&mut LinkGraph) -> R) -> R {
        let mut graph = self.inner.graph.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut graph)
    }

    /// Rebuild from `root` and swap the result in
    ///
    /// Returns `None` without doing anything if another rebuild is in flight.
    pub fn rebuild(&self, builder: &ProjectGraphBuilder, root: &Path) -> Option<BuildReport> {
        let _guard = match self.inner.rebuild.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                debug!(root = %root.display(), "Rebuild already in flight");
                return None;
            }
        };

        let mut fresh = LinkGraph::new();
        let report = builder.build_from_project(root, &mut fresh);
        self.write(|graph| *graph = fresh);
        Some(report)
    }

    /// Whether a rebuild is running right now
    pub fn is_rebuilding(&self) -> bool {
        matches!(self.inner.rebuild.try_lock(), Err(TryLockError::WouldBlock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgraph::{Node, NodeType};

    #[test]
    fn test_rebuild_replaces_graph() {
        let mut graph = LinkGraph::new();
        graph.add_node(Node::new("STALE", NodeType::Task, "old"));
        let shared = SharedLinkGraph::new(graph);

        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("requirements.json"), r#"{"R1": {}}"#).unwrap();

        let report = shared.rebuild(&ProjectGraphBuilder::default(), dir.path()).unwrap();
        assert!(report.is_clean());
        assert!(shared.read(|g| g.contains_node("R1")));
        assert!(!shared.read(|g| g.contains_node("STALE")));
    }

    #[test]
    fn test_concurrent_rebuild_is_refused() {
        let shared = SharedLinkGraph::default();
        let _held = shared.inner.rebuild.lock().unwrap();
        assert!(shared.is_rebuilding());

        let dir = tempfile::TempDir::new().unwrap();
        assert!(shared.rebuild(&ProjectGraphBuilder::default(), dir.path()).is_none());
    }

    #[test]
    fn test_write_then_read() {
        let shared = SharedLinkGraph::default();
        let clone = shared.clone();
        clone.write(|g| g.add_edge("A", "B", "related"));
        assert_eq!(shared.read(|g| g.edge_count()), 1);
    }
}
