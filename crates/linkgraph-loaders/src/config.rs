use linkgraph::NodeType;
use serde::{Deserialize, Serialize};

/// A legacy root-level JSON array file and the node type of its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySource {
    /// File name relative to the project root
    pub file: String,
    /// Node type assigned to every item
    pub node_type: NodeType,
}

impl LegacySource {
    /// Create a legacy source entry.
    pub fn new(file: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            file: file.into(),
            node_type,
        }
    }
}

/// Where each artifact lives, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    /// Mapping-of-ID-to-record file for requirements
    pub requirements_file: String,

    /// Top-level key holding the requirement mapping
    pub requirements_key: String,

    /// Heading-delimited epic/story Markdown document
    pub stories_file: String,

    /// Task list with optional dependency graph
    pub tasks_file: String,

    /// Directory holding one file per diagram
    pub diagrams_dir: String,

    /// Diagram file extensions, without the dot
    pub diagram_extensions: Vec<String>,

    /// UX/UI specification
    pub ux_spec_file: String,

    /// Data dictionary
    pub data_dictionary_file: String,

    /// Work breakdown / feature list
    pub work_breakdown_file: String,

    /// Tech stack descriptor
    pub tech_stack_file: String,

    /// Side file of approved links
    pub approved_links_file: String,

    /// Legacy generic JSON array files
    pub legacy_files: Vec<LegacySource>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            requirements_file: "requirements.json".to_string(),
            requirements_key: "requirements".to_string(),
            stories_file: "user_stories.md".to_string(),
            tasks_file: "tasks.json".to_string(),
            diagrams_dir: "diagrams".to_string(),
            diagram_extensions: vec!["mmd".to_string(), "puml".to_string()],
            ux_spec_file: "ux_spec.json".to_string(),
            data_dictionary_file: "data_dictionary.json".to_string(),
            work_breakdown_file: "work_breakdown.json".to_string(),
            tech_stack_file: "tech_stack.json".to_string(),
            approved_links_file: "approved_links.json".to_string(),
            legacy_files: vec![
                LegacySource::new("apis.json", NodeType::Api),
                LegacySource::new("tests.json", NodeType::Test),
                LegacySource::new("screens.json", NodeType::Screen),
                LegacySource::new("user_flows.json", NodeType::UserFlow),
            ],
        }
    }
}

/// Literal label texts used in the epic/story document.
///
/// Substitute these for documents written in another language; matching is
/// exact, not fuzzy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownLabels {
    /// Label listing an epic's requirements
    pub requirements: String,
    /// Label listing an epic's stories
    pub stories: String,
    /// Label naming a story's parent requirement
    pub requirement: String,
}

impl Default for MarkdownLabels {
    fn default() -> Self {
        Self {
            requirements: "Requirements".to_string(),
            stories: "User Stories".to_string(),
            requirement: "Requirement".to_string(),
        }
    }
}

/// Configuration for a project build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// File locations
    pub layout: ProjectLayout,

    /// Epic/story document labels
    pub labels: MarkdownLabels,

    /// Maximum file size to load (in bytes)
    /// Larger files are reported and skipped
    pub max_file_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            layout: ProjectLayout::default(),
            labels: MarkdownLabels::default(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl LoaderConfig {
    /// Set the project layout
    pub fn with_layout(mut self, layout: ProjectLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the Markdown labels
    pub fn with_labels(mut self, labels: MarkdownLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Set maximum file size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }
}
