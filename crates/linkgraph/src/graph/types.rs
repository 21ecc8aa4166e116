//! Core graph types: nodes, edges, node types and per-family details.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Type of an artifact node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    /// Requirement record
    #[serde(rename = "requirement")]
    Requirement,
    /// Epic grouping stories
    #[serde(rename = "epic")]
    Epic,
    /// User story
    #[serde(rename = "user_story")]
    UserStory,
    /// Implementation task
    #[serde(rename = "task")]
    Task,
    /// Diagram file
    #[serde(rename = "diagram")]
    Diagram,
    /// Test or feature file
    #[serde(rename = "test")]
    Test,
    /// Data dictionary entity
    #[serde(rename = "entity")]
    Entity,
    /// Work-breakdown feature
    #[serde(rename = "feature")]
    Feature,
    /// UX persona
    #[serde(rename = "persona")]
    Persona,
    /// UX user flow
    #[serde(rename = "user-flow")]
    UserFlow,
    /// UI screen
    #[serde(rename = "screen")]
    Screen,
    /// UI component
    #[serde(rename = "component")]
    Component,
    /// API specification entry
    #[serde(rename = "api")]
    Api,
    /// Tech stack descriptor
    #[serde(rename = "tech-stack")]
    TechStack,
}

impl NodeType {
    /// Every node type, in declaration order.
    pub const ALL: [NodeType; 14] = [
        NodeType::Requirement,
        NodeType::Epic,
        NodeType::UserStory,
        NodeType::Task,
        NodeType::Diagram,
        NodeType::Test,
        NodeType::Entity,
        NodeType::Feature,
        NodeType::Persona,
        NodeType::UserFlow,
        NodeType::Screen,
        NodeType::Component,
        NodeType::Api,
        NodeType::TechStack,
    ];

    /// Wire name of the type, as it appears in artifact files and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Requirement => "requirement",
            NodeType::Epic => "epic",
            NodeType::UserStory => "user_story",
            NodeType::Task => "task",
            NodeType::Diagram => "diagram",
            NodeType::Test => "test",
            NodeType::Entity => "entity",
            NodeType::Feature => "feature",
            NodeType::Persona => "persona",
            NodeType::UserFlow => "user-flow",
            NodeType::Screen => "screen",
            NodeType::Component => "component",
            NodeType::Api => "api",
            NodeType::TechStack => "tech-stack",
        }
    }

    /// Prefix used when an item of this type has no explicit ID.
    pub fn synthetic_prefix(&self) -> &'static str {
        match self {
            NodeType::Requirement => "REQ",
            NodeType::Epic => "EPIC",
            NodeType::UserStory => "US",
            NodeType::Task => "TASK",
            NodeType::Diagram => "DIAG",
            NodeType::Test => "TEST",
            NodeType::Entity => "ENTITY",
            NodeType::Feature => "FEAT",
            NodeType::Persona => "PERSONA",
            NodeType::UserFlow => "FLOW",
            NodeType::Screen => "SCREEN",
            NodeType::Component => "COMP",
            NodeType::Api => "API",
            NodeType::TechStack => "TECH",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GraphError::invalid(format!("unknown node type '{s}'")))
    }
}

/// Fields a loader extracts for a specific artifact family.
///
/// Anything else from the source record travels in [`Node::data`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDetails {
    /// Requirement record; `requirement_id` is the secondary identifier.
    Requirement {
        /// Secondary identifier embedded in the record
        requirement_id: Option<String>,
        /// Priority label
        priority: Option<String>,
        /// Status label
        status: Option<String>,
    },
    /// Epic heading with its listed requirements and stories.
    Epic {
        /// Requirement IDs listed under the epic
        requirement_ids: Vec<String>,
        /// Story IDs listed under the epic
        story_ids: Vec<String>,
    },
    /// User story heading.
    UserStory {
        /// Enclosing epic, if any
        epic_id: Option<String>,
        /// Parent requirement from the labeled line
        requirement_id: Option<String>,
    },
    /// Task list entry.
    Task {
        /// Status label
        status: Option<String>,
        /// Tasks this one depends on
        depends_on: Vec<String>,
    },
    /// Diagram file.
    Diagram {
        /// File name the diagram was loaded from
        file: String,
        /// Diagram kind from the file name (`flowchart`, `sequence`, ...)
        diagram_kind: String,
        /// Subject ID encoded in the file name
        subject_id: String,
    },
    /// User flow through screens.
    Flow {
        /// Persona driving the flow
        persona_id: Option<String>,
        /// Screens visited by the flow steps
        screen_ids: Vec<String>,
    },
    /// UI screen.
    Screen {
        /// Stories the screen implements
        story_ids: Vec<String>,
        /// Components placed on the screen
        component_ids: Vec<String>,
    },
    /// Work-breakdown feature.
    Feature {
        /// Stories delivered by the feature
        story_ids: Vec<String>,
        /// Requirements covered by the feature
        requirement_ids: Vec<String>,
    },
    /// No family-specific fields.
    #[default]
    Generic,
}

/// A node in the link graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Artifact identifier (`REQ-001`, `US-012`, synthetic IDs, ...)
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Artifact type
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Family-specific fields
    #[serde(default)]
    pub details: NodeDetails,
    /// Original source record
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Node {
    /// Create a node with an empty description and no payload.
    pub fn new(id: impl Into<String>, node_type: NodeType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            node_type,
            description: String::new(),
            details: NodeDetails::Generic,
            data: Map::new(),
        }
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set the family-specific details.
    pub fn with_details(mut self, details: NodeDetails) -> Self {
        self.details = details;
        self
    }

    /// Builder: attach the original source record.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Secondary identifier the node is also addressable by.
    pub fn secondary_id(&self) -> Option<&str> {
        match &self.details {
            NodeDetails::Requirement {
                requirement_id: Some(rid),
                ..
            } if !rid.is_empty() => Some(rid.as_str()),
            _ => None,
        }
    }

    /// Merge a patch into this node. Present fields overwrite, payload keys merge.
    pub fn merge(&mut self, patch: NodePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(node_type) = patch.node_type {
            self.node_type = node_type;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(details) = patch.details {
            self.details = details;
        }
        self.data.extend(patch.data);
    }
}

/// Partial node update used by [`crate::LinkGraph::update_node`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    /// New title
    pub title: Option<String>,
    /// New type
    pub node_type: Option<NodeType>,
    /// New description
    pub description: Option<String>,
    /// New details
    pub details: Option<NodeDetails>,
    /// Payload keys to add or overwrite
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl NodePatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set the node type.
    pub fn node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Builder: set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: replace the type-specific details.
    pub fn details(mut self, details: NodeDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Builder: add a payload key.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Turn the patch into a fresh node, if it carries a type.
    pub(crate) fn into_node(self, id: &str) -> Option<Node> {
        let node_type = self.node_type?;
        let mut node = Node::new(id, node_type, self.title.clone().unwrap_or_else(|| id.to_string()));
        node.merge(self);
        Some(node)
    }
}

/// A directed, typed edge between two node IDs.
///
/// Identity is the `(source, target, edge_type)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID
    pub source: String,
    /// Target node ID
    pub target: String,
    /// Relationship label (`dependency`, `epic_story`, `task_blocks`, ...)
    pub edge_type: String,
    /// Reserved; loaders never set it
    #[serde(default)]
    pub bidirectional: bool,
}

impl Edge {
    /// Create a directed edge.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type: edge_type.into(),
            bidirectional: false,
        }
    }
}
