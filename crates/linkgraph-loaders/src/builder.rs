//! Full project rebuild.

use crate::config::LoaderConfig;
use crate::loaders::{
    ApprovedLinksLoader, DataDictionaryLoader, DiagramsLoader, EpicsLoader, GenericArrayLoader,
    RequirementsLoader, TasksLoader, TechStackLoader, UxSpecLoader, WorkBreakdownLoader,
};
use crate::metrics::LoaderMetrics;
use crate::traits::{ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::LinkGraph;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// A loader failure that was recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the loader that failed
    pub loader: String,
    /// Error text
    pub message: String,
}

/// Outcome of [`ProjectGraphBuilder::build_from_project`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Counters for this build
    pub metrics: LoaderMetrics,
    /// One entry per failed loader
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// Whether every source that was present loaded without error
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs every loader against a project directory
pub struct ProjectGraphBuilder {
    config: LoaderConfig,
    loaders: Vec<Box<dyn ArtifactLoader>>,
}

impl ProjectGraphBuilder {
    /// Builder with the standard loader sequence for `config`
    ///
    /// Order: requirements, epics/stories, tasks, UX spec, work breakdown,
    /// data dictionary, tech stack, legacy arrays, diagrams, approved links.
    /// Diagrams run late so their subjects are already present; approved
    /// links run last so they only add to the structural graph.
    pub fn new(config: LoaderConfig) -> Self {
        let layout = &config.layout;
        let mut loaders: Vec<Box<dyn ArtifactLoader>> = vec![
            Box::new(RequirementsLoader::new(
                &layout.requirements_file,
                &layout.requirements_key,
            )),
            Box::new(EpicsLoader::new(&layout.stories_file, config.labels.clone())),
            Box::new(TasksLoader::new(&layout.tasks_file)),
            Box::new(UxSpecLoader::new(&layout.ux_spec_file)),
            Box::new(WorkBreakdownLoader::new(&layout.work_breakdown_file)),
            Box::new(DataDictionaryLoader::new(&layout.data_dictionary_file)),
            Box::new(TechStackLoader::new(&layout.tech_stack_file)),
        ];
        for source in &layout.legacy_files {
            loaders.push(Box::new(GenericArrayLoader::new(source.clone())));
        }
        loaders.push(Box::new(DiagramsLoader::new(
            &layout.diagrams_dir,
            layout.diagram_extensions.clone(),
        )));
        loaders.push(Box::new(ApprovedLinksLoader::new(&layout.approved_links_file)));

        Self { config, loaders }
    }

    /// Builder running exactly `loaders`, in order
    pub fn with_loaders(config: LoaderConfig, loaders: Vec<Box<dyn ArtifactLoader>>) -> Self {
        Self { config, loaders }
    }

    /// The configuration in use
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Names of the loaders, in run order
    pub fn loader_names(&self) -> Vec<&str> {
        self.loaders.iter().map(|loader| loader.name()).collect()
    }

    /// Clear `graph` and load every source under `root` into it
    ///
    /// A failing loader is logged and recorded in the report; what it added
    /// before failing stays and the remaining loaders still run.
    #[instrument(skip(self, root, graph), fields(root = %root.display()))]
    pub fn build_from_project(&self, root: &Path, graph: &mut LinkGraph) -> BuildReport {
        let start = Instant::now();
        let ctx = LoadContext::new(root, self.config.max_file_size);
        let mut report = BuildReport::default();

        graph.clear();

        for loader in &self.loaders {
            let nodes_before = graph.node_count();
            let edges_before = graph.edge_count();
            report.metrics.sources_attempted += 1;

            match loader.load(&ctx, graph) {
                Ok(SourceStatus::Loaded) => {
                    report.metrics.sources_loaded += 1;
                    debug!(
                        loader = loader.name(),
                        nodes = graph.node_count().saturating_sub(nodes_before),
                        edges = graph.edge_count() - edges_before,
                        "Loaded source"
                    );
                }
                Ok(SourceStatus::Missing) => {
                    report.metrics.sources_missing += 1;
                    debug!(loader = loader.name(), sources = ?loader.sources(&ctx), "Source absent");
                }
                Err(e) => {
                    report.metrics.sources_failed += 1;
                    warn!(loader = loader.name(), error = %e, "Loader failed, skipping source");
                    report.diagnostics.push(Diagnostic {
                        loader: loader.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.metrics.nodes_added = graph.node_count();
        report.metrics.edges_added = graph.edge_count();
        report.metrics.total_load_time = start.elapsed();

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            failed = report.metrics.sources_failed,
            "Project graph built"
        );
        report
    }
}

impl Default for ProjectGraphBuilder {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}
