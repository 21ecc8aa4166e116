//! Side file of user-approved links.
//!
//! ```json
//! {"links": [{"source_id": "US-1", "target_id": "REQ-4", "link_type": "story_requirement",
//!             "reasoning": "...", "confidence": 0.9, "created_at": "2026-01-05T10:00:00Z"}]}
//! ```
//!
//! The file is re-read on every build and its links added after all
//! structural sources. [`ApprovedLinkLog`] appends to it without dropping
//! earlier records.

use crate::errors::{LoaderError, LoaderResult};
use crate::record::str_field;
use crate::source::read_json;
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use chrono::{DateTime, NaiveDateTime, Utc};
use linkgraph::LinkGraph;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Timestamp layouts accepted without an offset; these are read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One approved link record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovedLink {
    /// Source node ID
    pub source_id: String,
    /// Target node ID
    pub target_id: String,
    /// Edge type to add
    pub link_type: String,
    /// Why the link was proposed
    pub reasoning: String,
    /// Confidence of the proposal, 0.0 to 1.0
    pub confidence: f64,
    /// When the link was approved
    pub created_at: Option<DateTime<Utc>>,
}

impl ApprovedLink {
    /// A link approved now.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        link_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            link_type: link_type.into(),
            reasoning: String::new(),
            confidence: 0.0,
            created_at: Some(Utc::now()),
        }
    }

    /// Set the reasoning text.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Read one side-file entry.
    ///
    /// Only `source_id`, `target_id` and `link_type` are required. A
    /// `confidence` may be a number or a numeric string, and `created_at`
    /// may lack an offset; unreadable optional fields fall back to defaults.
    pub fn from_record(record: &Map<String, Value>) -> Option<Self> {
        let confidence = match record.get("confidence") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0.0,
        };
        Some(Self {
            source_id: str_field(record, &["source_id"])?,
            target_id: str_field(record, &["target_id"])?,
            link_type: str_field(record, &["link_type"])?,
            reasoning: str_field(record, &["reasoning"]).unwrap_or_default(),
            confidence,
            created_at: str_field(record, &["created_at"]).and_then(|s| parse_timestamp(&s)),
        })
    }
}

/// RFC 3339, or one of [`NAIVE_TIMESTAMP_FORMATS`] taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// Records of a parsed side file. Entries that do not parse are skipped.
pub fn approved_links(path: &Path, value: &Value) -> LoaderResult<Vec<ApprovedLink>> {
    let links = value
        .get("links")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            LoaderError::InvalidShape(path.to_path_buf(), "missing \"links\" array".to_string())
        })?;

    let mut parsed = Vec::with_capacity(links.len());
    for entry in links {
        match entry.as_object().and_then(ApprovedLink::from_record) {
            Some(link) => parsed.push(link),
            None => warn!(path = %path.display(), "Skipping approved link entry without endpoints or type"),
        }
    }
    Ok(parsed)
}

/// Adds the approved links as edges
pub struct ApprovedLinksLoader {
    file: String,
}

impl ApprovedLinksLoader {
    /// Loader for `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Add every approved link of an already parsed side file
    ///
    /// Endpoints need not exist; the edge is recorded regardless.
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        for link in approved_links(path, value)? {
            graph.add_edge(&link.source_id, &link.target_id, &link.link_type);
        }
        Ok(())
    }
}

impl ArtifactLoader for ApprovedLinksLoader {
    fn name(&self) -> &str {
        "approved_links"
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

/// Appends approvals to the side file
#[derive(Debug, Clone)]
pub struct ApprovedLinkLog {
    path: PathBuf,
}

impl ApprovedLinkLog {
    /// Log stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the side file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `link`, creating the file with `{"links": []}` first if needed
    ///
    /// Existing records are written back unchanged, keys in their original
    /// order. The new document replaces the old one by rename.
    ///
    /// # Errors
    /// Fails without touching the file if the existing content is not a side
    /// file or the write does not complete.
    pub fn append(&self, link: &ApprovedLink) -> LoaderResult<()> {
        let mut document = read_json(&self.path, usize::MAX)?.unwrap_or_else(|| json!({"links": []}));

        let links = document
            .get_mut("links")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| {
                LoaderError::InvalidShape(self.path.clone(), "missing \"links\" array".to_string())
            })?;
        let record = serde_json::to_value(link).map_err(|e| LoaderError::Json(self.path.clone(), e))?;
        links.push(record);
        let count = links.len();

        let text = serde_json::to_string_pretty(&document)
            .map_err(|e| LoaderError::Json(self.path.clone(), e))?;
        self.replace_with(text.as_bytes())?;
        debug!(path = %self.path.display(), count, "Appended approved link");
        Ok(())
    }

    fn replace_with(&self, bytes: &[u8]) -> LoaderResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |e| LoaderError::IoError(self.path.clone(), e);
        let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
        staged.write_all(bytes).map_err(io_err)?;
        staged.flush().map_err(io_err)?;
        staged.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Every record currently in the side file. A missing file has none.
    pub fn read_all(&self) -> LoaderResult<Vec<ApprovedLink>> {
        match read_json(&self.path, usize::MAX)? {
            Some(value) => approved_links(&self.path, &value),
            None => Ok(Vec::new()),
        }
    }
}
