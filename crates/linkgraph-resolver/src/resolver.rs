//! Change-to-node resolution with a content cache.

use crate::diff::LineDiff;
use crate::error::{ResolveError, Result};
use crate::extract::{
    changed_records, changed_sections, diagram_subject, feature_references, id_tokens,
    list_records, mapping_records, symmetric_difference, Records,
};
use crate::file_type::{FileType, FileTypeTable};
use chrono::{DateTime, Utc};
use linkgraph::NodeType;
use linkgraph_loaders::LoaderConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Prefixes of requirement IDs: generated `REQ-n` and business `BR-n` numbers.
const DEFAULT_REQUIREMENT_PREFIXES: [&str; 2] = ["REQ", "BR"];

/// What happened to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// No previous content was known
    Created,
    /// Previous and current content both exist
    Modified,
    /// The file no longer exists
    Deleted,
}

/// A resolved file change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Changed file
    pub path: PathBuf,
    /// How the file was compared
    pub file_type: FileType,
    /// Created, modified or deleted
    pub kind: ChangeKind,
    /// Affected node IDs, sorted and without duplicates
    pub affected_ids: Vec<String>,
    /// Line counts, `+A -R lines`
    pub summary: String,
    /// When the change was resolved
    pub detected_at: DateTime<Utc>,
}

/// Maps file changes to affected node IDs, remembering the content it last saw
/// for every path.
#[derive(Debug, Clone)]
pub struct ChangeResolver {
    table: FileTypeTable,
    requirements_key: String,
    known_prefixes: BTreeSet<String>,
    requirement_prefixes: BTreeSet<String>,
    cache: HashMap<PathBuf, String>,
}

impl Default for ChangeResolver {
    fn default() -> Self {
        Self::new(FileTypeTable::default())
    }
}

impl ChangeResolver {
    /// Resolver using `table` and the default requirement mapping key
    pub fn new(table: FileTypeTable) -> Self {
        Self {
            table,
            requirements_key: LoaderConfig::default().layout.requirements_key,
            known_prefixes: NodeType::ALL
                .iter()
                .map(|ty| ty.synthetic_prefix().to_string())
                .collect(),
            requirement_prefixes: DEFAULT_REQUIREMENT_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            cache: HashMap::new(),
        }
    }

    /// Resolver matching the files of a loader configuration
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            requirements_key: config.layout.requirements_key.clone(),
            ..Self::new(FileTypeTable::from_layout(&config.layout))
        }
    }

    /// Replace the ID prefixes accepted as diagram subjects
    pub fn with_known_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the ID prefixes read as requirement references in feature files
    pub fn with_requirement_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirement_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Dispatch table in use
    pub fn table(&self) -> &FileTypeTable {
        &self.table
    }

    /// Remember `content` as the current content of `path`
    pub fn prime(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.cache.insert(path.into(), content.into());
    }

    /// Content last seen for `path`
    pub fn cached(&self, path: &Path) -> Option<&str> {
        self.cache.get(path).map(String::as_str)
    }

    /// Drop everything remembered
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Read `path` and resolve its change against `old_content`, or against
    /// the cached content when none is given
    ///
    /// A missing file is a deletion.
    ///
    /// # Errors
    /// Returns [`ResolveError::IoError`] if the file exists but cannot be read.
    /// The cache is left untouched in that case.
    #[instrument(skip(self, path, old_content), fields(path = %path.display()))]
    pub fn detect_change(&mut self, path: &Path, old_content: Option<String>) -> Result<ChangeEvent> {
        let current = match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(ResolveError::IoError(path.to_path_buf(), e)),
        };
        Ok(self.resolve(path, old_content, current))
    }

    /// Resolve a change whose current content is already known
    ///
    /// `current == None` means the file was deleted. The cache is updated
    /// with `current` as the last step.
    pub fn resolve(
        &mut self,
        path: &Path,
        old_content: Option<String>,
        current: Option<String>,
    ) -> ChangeEvent {
        let previous = old_content.or_else(|| self.cache.get(path).cloned());
        let file_type = self.table.classify(path);

        let kind = match (&previous, &current) {
            (_, None) => ChangeKind::Deleted,
            (None, Some(_)) => ChangeKind::Created,
            (Some(_), Some(_)) => ChangeKind::Modified,
        };

        let affected = if previous == current {
            BTreeSet::new()
        } else {
            self.affected_ids(file_type, path, previous.as_deref(), current.as_deref())
        };
        let summary = LineDiff::between(
            previous.as_deref().unwrap_or_default(),
            current.as_deref().unwrap_or_default(),
        );

        let event = ChangeEvent {
            path: path.to_path_buf(),
            file_type,
            kind,
            affected_ids: affected.into_iter().collect(),
            summary: summary.to_string(),
            detected_at: Utc::now(),
        };
        info!(
            file_type = %file_type,
            kind = ?kind,
            affected = event.affected_ids.len(),
            summary = %event.summary,
            "Resolved file change"
        );

        match current {
            Some(text) => {
                self.cache.insert(path.to_path_buf(), text);
            }
            None => {
                self.cache.remove(path);
            }
        }
        event
    }

    fn affected_ids(
        &self,
        file_type: FileType,
        path: &Path,
        old: Option<&str>,
        new: Option<&str>,
    ) -> BTreeSet<String> {
        match file_type {
            FileType::RecordMapping => self
                .record_change(old, new, |value| mapping_records(value, &self.requirements_key)),
            FileType::RecordList => self.record_change(old, new, list_records),
            FileType::HeadingDocument | FileType::Markdown => {
                let (old, new) = (old.unwrap_or_default(), new.unwrap_or_default());
                let mut ids = symmetric_difference(&id_tokens(old), &id_tokens(new));
                ids.extend(changed_sections(old, new));
                ids
            }
            FileType::Diagram => diagram_subject(path, &self.known_prefixes)
                .into_iter()
                .collect(),
            FileType::Feature => {
                feature_references(new.or(old).unwrap_or_default(), &self.requirement_prefixes)
            }
            FileType::Json => token_change(old, new),
            FileType::Unknown => BTreeSet::new(),
        }
    }

    /// Changed keys of a structured file; falls back to token comparison when
    /// either side does not parse as the expected shape.
    fn record_change(
        &self,
        old: Option<&str>,
        new: Option<&str>,
        records: impl Fn(&serde_json::Value) -> Option<Records>,
    ) -> BTreeSet<String> {
        let parse = |text: Option<&str>| -> Option<Records> {
            match text {
                None => Some(Records::new()),
                Some(text) => serde_json::from_str(text).ok().and_then(|value| records(&value)),
            }
        };

        match (parse(old), parse(new)) {
            (Some(old_records), Some(new_records)) => changed_records(&old_records, &new_records),
            _ => {
                debug!("Structured content did not parse, comparing ID tokens");
                token_change(old, new)
            }
        }
    }
}

fn token_change(old: Option<&str>, new: Option<&str>) -> BTreeSet<String> {
    symmetric_difference(
        &id_tokens(old.unwrap_or_default()),
        &id_tokens(new.unwrap_or_default()),
    )
}
