//! Dispatch from a changed file's name to how its changes are resolved.

use linkgraph_loaders::ProjectLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// How a changed file is compared against its previous content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Mapping of ID to record
    RecordMapping,
    /// Array of records carrying an `id`
    RecordList,
    /// Heading-delimited epic/story document
    HeadingDocument,
    /// One diagram, named after its subject
    Diagram,
    /// Gherkin feature file
    Feature,
    /// Any other JSON file
    Json,
    /// Any other Markdown file
    Markdown,
    /// Not an artifact format
    Unknown,
}

impl FileType {
    /// Snake-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::RecordMapping => "record_mapping",
            FileType::RecordList => "record_list",
            FileType::HeadingDocument => "heading_document",
            FileType::Diagram => "diagram",
            FileType::Feature => "feature",
            FileType::Json => "json",
            FileType::Markdown => "markdown",
            FileType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact file names first, then extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeTable {
    exact: BTreeMap<String, FileType>,
    extensions: BTreeMap<String, FileType>,
}

impl Default for FileTypeTable {
    fn default() -> Self {
        Self::from_layout(&ProjectLayout::default())
    }
}

impl FileTypeTable {
    /// A table that classifies everything as [`FileType::Unknown`]
    pub fn empty() -> Self {
        Self {
            exact: BTreeMap::new(),
            extensions: BTreeMap::new(),
        }
    }

    /// Table matching the artifact files of `layout`
    pub fn from_layout(layout: &ProjectLayout) -> Self {
        let mut table = Self::empty()
            .with_extension("feature", FileType::Feature)
            .with_extension("json", FileType::Json)
            .with_extension("md", FileType::Markdown);
        for ext in &layout.diagram_extensions {
            table = table.with_extension(ext, FileType::Diagram);
        }

        table = table
            .with_file(&layout.requirements_file, FileType::RecordMapping)
            .with_file(&layout.tasks_file, FileType::RecordList)
            .with_file(&layout.work_breakdown_file, FileType::RecordList)
            .with_file(&layout.stories_file, FileType::HeadingDocument);
        for legacy in &layout.legacy_files {
            table = table.with_file(&legacy.file, FileType::RecordList);
        }
        table
    }

    /// Classify files named `name` as `file_type`
    pub fn with_file(mut self, name: &str, file_type: FileType) -> Self {
        let name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);
        self.exact.insert(name.to_string(), file_type);
        self
    }

    /// Classify files ending in `.{ext}` as `file_type`
    pub fn with_extension(mut self, ext: &str, file_type: FileType) -> Self {
        self.extensions
            .insert(ext.trim_start_matches('.').to_string(), file_type);
        self
    }

    /// File type of `path`
    pub fn classify(&self, path: &Path) -> FileType {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if let Some(file_type) = self.exact.get(name) {
                return *file_type;
            }
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.extensions.get(ext))
            .copied()
            .unwrap_or(FileType::Unknown)
    }
}
