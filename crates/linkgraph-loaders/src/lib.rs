//! Linkgraph Loaders
//!
//! Artifact file loaders that populate a [`linkgraph::LinkGraph`] from a
//! project directory.
//!
//! This crate provides:
//!
//! - **ArtifactLoader trait**: the interface every format loader implements
//! - **Loaders**: requirements, epics/stories, tasks, diagrams, UX spec,
//!   legacy arrays, data dictionary, work breakdown, tech stack and the
//!   approved-links side file
//! - **Configuration**: file layout and Markdown label texts
//! - **ProjectGraphBuilder**: a full rebuild that reports instead of failing
//! - **SharedLinkGraph**: a handle with single-flight rebuilds
//!
//! # Example
//!
//! ```rust,no_run
//! use linkgraph::LinkGraph;
//! use linkgraph_loaders::{LoaderConfig, ProjectGraphBuilder};
//! use std::path::Path;
//!
//! let builder = ProjectGraphBuilder::new(LoaderConfig::default());
//! let mut graph = LinkGraph::new();
//! let report = builder.build_from_project(Path::new("./project"), &mut graph);
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{}: {}", diagnostic.loader, diagnostic.message);
//! }
//! println!("orphans: {:?}", graph.get_orphan_nodes());
//! ```

pub mod builder;
pub mod config;
pub mod errors;
pub mod loaders;
pub mod metrics;
pub mod record;
pub mod shared;
pub mod source;
pub mod traits;

// Re-export commonly used types
pub use builder::{BuildReport, Diagnostic, ProjectGraphBuilder};
pub use config::{LegacySource, LoaderConfig, MarkdownLabels, ProjectLayout};
pub use errors::{LoaderError, LoaderResult};
pub use loaders::{ApprovedLink, ApprovedLinkLog};
pub use metrics::LoaderMetrics;
pub use shared::SharedLinkGraph;
pub use traits::{ArtifactLoader, LoadContext, SourceStatus};
