//! Epics and user stories from a heading-delimited Markdown document.
//!
//! ```markdown
//! ## EPIC-001: Onboarding
//! **Requirements:** [REQ-001, REQ-002]
//! **User Stories:** [US-001]
//!
//! ### US-001: Sign up
//! **Requirement:** REQ-001
//! As a visitor I want to create an account.
//! ```
//!
//! Level-two headings are epics, level-three headings are stories. Labels are
//! matched literally so they can be configured for other languages.

use crate::config::MarkdownLabels;
use crate::errors::LoaderResult;
use crate::record::split_ids;
use crate::source::read_text;
use crate::traits::{ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeDetails, NodeType};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::LazyLock;

static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{2,3})\s+([A-Z][A-Z0-9_]*-\d+)\s*:\s*(.*?)\s*$").unwrap()
});

/// A `##`/`###` section of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading level, 2 or 3
    pub level: usize,
    /// ID from the heading
    pub id: String,
    /// Title from the heading
    pub title: String,
    /// Lines between this heading and the next one
    pub body: String,
}

/// Split a document into ID-headed sections.
///
/// Text before the first recognised heading is ignored; any other `#` heading
/// ends the current section.
pub fn parse_sections(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some(caps) = RE_HEADING.captures(line) {
            sections.extend(current.take());
            current = Some(Section {
                level: caps[1].len(),
                id: caps[2].to_string(),
                title: caps[3].to_string(),
                body: String::new(),
            });
            continue;
        }

        // Other headings up to level 3 close the section; deeper ones belong to it
        if matches!(heading_level(line), Some(1..=3)) {
            sections.extend(current.take());
            continue;
        }

        if let Some(section) = current.as_mut() {
            if !section.body.is_empty() {
                section.body.push('\n');
            }
            section.body.push_str(line);
        }
    }
    sections.extend(current);

    for section in &mut sections {
        section.body = section.body.trim().to_string();
    }
    sections
}

fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let rest = trimmed.trim_start_matches('#');
    let level = trimmed.len() - rest.len();
    (level > 0 && (rest.is_empty() || rest.starts_with(char::is_whitespace))).then_some(level)
}

/// IDs on a `**Label:** [a, b]` line, if `line` is one.
pub fn labeled_ids(line: &str, label: &str) -> Option<Vec<String>> {
    let line = line.trim_start();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .unwrap_or(line)
        .trim_start();
    let rest = line
        .strip_prefix("**")?
        .strip_prefix(label)?
        .strip_prefix(":**")?;
    Some(split_ids(rest))
}

/// Loads epic and user story nodes with their listed links
pub struct EpicsLoader {
    file: String,
    labels: MarkdownLabels,
}

impl EpicsLoader {
    /// Loader for `file` using `labels`
    pub fn new(file: impl Into<String>, labels: MarkdownLabels) -> Self {
        Self {
            file: file.into(),
            labels,
        }
    }

    /// Add every epic and story in `text` to the graph
    pub fn load_markdown(&self, text: &str, graph: &mut LinkGraph) {
        let mut current_epic: Option<String> = None;

        for section in parse_sections(text) {
            if section.level == 2 {
                current_epic = Some(section.id.clone());
                self.add_epic(&section, graph);
            } else {
                self.add_story(&section, current_epic.clone(), graph);
            }
        }
    }

    fn add_epic(&self, section: &Section, graph: &mut LinkGraph) {
        let requirement_ids = self.collect(&section.body, &self.labels.requirements);
        let story_ids = self.collect(&section.body, &self.labels.stories);

        let node = Node::new(&section.id, NodeType::Epic, &section.title)
            .with_description(self.description(&section.body))
            .with_details(NodeDetails::Epic {
                requirement_ids: requirement_ids.clone(),
                story_ids: story_ids.clone(),
            })
            .with_data(section_data(section));
        graph.add_node(node);

        for req in &requirement_ids {
            graph.add_edge(&section.id, req, "epic_requirement");
        }
        for story in &story_ids {
            graph.add_edge(&section.id, story, "epic_story");
        }
    }

    fn add_story(&self, section: &Section, epic_id: Option<String>, graph: &mut LinkGraph) {
        let requirements = self.collect(&section.body, &self.labels.requirement);

        let node = Node::new(&section.id, NodeType::UserStory, &section.title)
            .with_description(self.description(&section.body))
            .with_details(NodeDetails::UserStory {
                epic_id,
                requirement_id: requirements.first().cloned(),
            })
            .with_data(section_data(section));
        graph.add_node(node);

        for req in &requirements {
            graph.add_edge(&section.id, req, "story_requirement");
        }
    }

    fn collect(&self, body: &str, label: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for found in body.lines().filter_map(|line| labeled_ids(line, label)) {
            for id in found {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    fn description(&self, body: &str) -> String {
        let labels = [
            self.labels.requirements.as_str(),
            self.labels.stories.as_str(),
            self.labels.requirement.as_str(),
        ];
        body.lines()
            .filter(|line| !labels.iter().any(|label| labeled_ids(line, label).is_some()))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

fn section_data(section: &Section) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("title".to_string(), Value::from(section.title.clone()));
    data.insert("body".to_string(), Value::from(section.body.clone()));
    data
}

impl ArtifactLoader for EpicsLoader {
    fn name(&self) -> &str {
        "epics"
    }

    fn load(&self, ctx: &LoadContext, graph: &mut LinkGraph) -> LoaderResult<SourceStatus> {
        match read_text(&ctx.path(&self.file), ctx.max_file_size)? {
            Some(text) => {
                self.load_markdown(&text, graph);
                Ok(SourceStatus::Loaded)
            }
            None => Ok(SourceStatus::Missing),
        }
    }

    fn sources(&self, ctx: &LoadContext) -> Vec<PathBuf> {
        vec![ctx.path(&self.file)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Backlog\n\
intro text\n\
\n\
## EPIC-001: Onboarding\n\
**Requirements:** [REQ-001, REQ-002]\n\
**User Stories:** [US-001, US-002]\n\
Everything a new user sees.\n\
\n\
### US-001: Sign up\n\
**Requirement:** REQ-001\n\
As a visitor I want an account.\n\
\n\
### US-002: Verify email\n\
**Requirement:** [REQ-002]\n";

    #[test]
    fn test_sections() {
        let sections = parse_sections(DOC);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].level, 2);
        assert_eq!(sections[0].id, "EPIC-001");
        assert_eq!(sections[1].title, "Sign up");
        assert!(sections[1].body.ends_with("want an account."));
    }

    #[test]
    fn test_epic_and_story_edges() {
        let mut graph = LinkGraph::new();
        EpicsLoader::new("user_stories.md", MarkdownLabels::default()).load_markdown(DOC, &mut graph);

        assert_eq!(graph.get_node("EPIC-001").unwrap().node_type, NodeType::Epic);
        assert_eq!(graph.get_node("US-001").unwrap().node_type, NodeType::UserStory);
        assert_eq!(
            graph.get_link_type("EPIC-001", "REQ-002").as_deref(),
            Some("epic_requirement")
        );
        assert_eq!(graph.get_link_type("EPIC-001", "US-002").as_deref(), Some("epic_story"));
        assert_eq!(
            graph.get_link_type("US-001", "REQ-001").as_deref(),
            Some("story_requirement")
        );
        assert_eq!(
            graph.get_link_type("US-002", "REQ-002").as_deref(),
            Some("story_requirement")
        );
        assert_eq!(
            graph.get_node("EPIC-001").unwrap().description,
            "Everything a new user sees."
        );
        match &graph.get_node("US-002").unwrap().details {
            NodeDetails::UserStory { epic_id, requirement_id } => {
                assert_eq!(epic_id.as_deref(), Some("EPIC-001"));
                assert_eq!(requirement_id.as_deref(), Some("REQ-002"));
            }
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_subheadings_stay_in_story() {
        let doc = "### US-3: Reset password
As a user I forget things.

#### Acceptance Criteria
- link expires
**Requirement:** REQ-5

## Appendix
**Requirement:** REQ-9
";

        let sections = parse_sections(doc);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].body.contains("link expires"));
        assert!(!sections[0].body.contains("REQ-9"));

        let mut graph = LinkGraph::new();
        EpicsLoader::new("user_stories.md", MarkdownLabels::default()).load_markdown(doc, &mut graph);
        assert_eq!(
            graph.get_link_type("US-3", "REQ-5").as_deref(),
            Some("story_requirement")
        );
        assert_eq!(graph.get_link_type("US-3", "REQ-9"), None);
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("## Appendix"), Some(2));
        assert_eq!(heading_level("#### Notes"), Some(4));
        assert_eq!(heading_level("#tag"), None);
        assert_eq!(heading_level("plain"), None);
    }

    #[test]
    fn test_localized_labels() {
        let doc = "## EPIC-7: Anmeldung\n**Anforderungen:** [REQ-1]\n**Benutzergeschichten:** [US-9]\n\n### US-9: Registrieren\n**Anforderung:** REQ-1\n";
        let labels = MarkdownLabels {
            requirements: "Anforderungen".to_string(),
            stories: "Benutzergeschichten".to_string(),
            requirement: "Anforderung".to_string(),
        };
        let mut graph = LinkGraph::new();
        EpicsLoader::new("x.md", labels).load_markdown(doc, &mut graph);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.get_link_type("US-9", "REQ-1").as_deref(), Some("story_requirement"));
    }

    #[test]
    fn test_english_labels_do_not_match_localized_doc() {
        let doc = "### US-9: Registrieren\n**Anforderung:** REQ-1\n";
        let mut graph = LinkGraph::new();
        EpicsLoader::new("x.md", MarkdownLabels::default()).load_markdown(doc, &mut graph);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.get_orphan_nodes(), vec!["US-9".to_string()]);
    }

    #[test]
    fn test_labeled_ids() {
        assert_eq!(
            labeled_ids("- **Requirements:** [REQ-1, REQ-2]", "Requirements"),
            Some(vec!["REQ-1".to_string(), "REQ-2".to_string()])
        );
        assert_eq!(labeled_ids("**Requirements:** [REQ-1]", "Requirement"), None);
        assert_eq!(labeled_ids("plain text", "Requirement"), None);
    }
}
