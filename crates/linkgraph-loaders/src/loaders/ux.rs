//! UX/UI specification: personas, user flows, screens, components and
//! information-architecture entries.
//!
//! Each section is an array of objects; anything else in a section is
//! skipped. Information-architecture entries are loaded as screens.

use crate::errors::{LoaderError, LoaderResult};
use crate::record::{id_list, objects, record_id, str_field};
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeDetails, NodeType};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const STORY_KEYS: &[&str] = &["user_stories", "story_ids", "stories"];
const COMPONENT_KEYS: &[&str] = &["components", "component_ids"];

/// Loads persona, user-flow, screen and component nodes
pub struct UxSpecLoader {
    file: String,
}

impl UxSpecLoader {
    /// Loader for `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Add every UX object of an already parsed document to the graph
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        let root = value.as_object().ok_or_else(|| {
            LoaderError::InvalidShape(path.to_path_buf(), "expected a JSON object".to_string())
        })?;

        for persona in objects(root.get("personas")) {
            add_plain(persona, NodeType::Persona, graph);
        }
        for component in objects(root.get("components")) {
            add_plain(component, NodeType::Component, graph);
        }
        for screen in objects(root.get("screens")) {
            add_screen(screen, graph);
        }
        for entry in objects(root.get("information_architecture")) {
            add_screen(entry, graph);
        }
        for flow in objects(root.get("user_flows")) {
            add_flow(flow, graph);
        }
        Ok(())
    }
}

fn title_of(record: &Map<String, Value>, id: &str) -> String {
    str_field(record, &["name", "title"]).unwrap_or_else(|| id.to_string())
}

fn add_plain(record: &Map<String, Value>, node_type: NodeType, graph: &mut LinkGraph) {
    let id = record_id(record, node_type, graph);
    let node = Node::new(&id, node_type, title_of(record, &id))
        .with_description(str_field(record, &["description"]).unwrap_or_default())
        .with_data(record.clone());
    graph.add_node(node);
}

fn add_screen(record: &Map<String, Value>, graph: &mut LinkGraph) {
    let id = record_id(record, NodeType::Screen, graph);
    let story_ids = id_list(record, STORY_KEYS);
    let component_ids = id_list(record, COMPONENT_KEYS);

    let node = Node::new(&id, NodeType::Screen, title_of(record, &id))
        .with_description(str_field(record, &["description", "purpose"]).unwrap_or_default())
        .with_details(NodeDetails::Screen {
            story_ids: story_ids.clone(),
            component_ids: component_ids.clone(),
        })
        .with_data(record.clone());
    graph.add_node(node);

    for story in &story_ids {
        graph.add_edge(&id, story, "screen_story");
    }
    for component in &component_ids {
        graph.add_edge(&id, component, "screen_component");
    }
}

fn add_flow(record: &Map<String, Value>, graph: &mut LinkGraph) {
    let id = record_id(record, NodeType::UserFlow, graph);
    let persona_id = str_field(record, &["persona_id", "persona"]);

    let mut screen_ids: Vec<String> = Vec::new();
    for step in objects(record.get("steps")) {
        if let Some(screen) = str_field(step, &["screen_id", "screen"]) {
            if !screen_ids.contains(&screen) {
                screen_ids.push(screen);
            }
        }
    }

    let node = Node::new(&id, NodeType::UserFlow, title_of(record, &id))
        .with_description(str_field(record, &["description", "goal"]).unwrap_or_default())
        .with_details(NodeDetails::Flow {
            persona_id: persona_id.clone(),
            screen_ids: screen_ids.clone(),
        })
        .with_data(record.clone());
    graph.add_node(node);

    if let Some(persona) = persona_id {
        graph.add_edge(&id, &persona, "flow_persona");
    }
    for screen in &screen_ids {
        graph.add_edge(&id, screen, "flow_screen");
    }
}

impl ArtifactLoader for UxSpecLoader {
    fn name(&self) -> &str {
        "ux_spec"
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: Value) -> LinkGraph {
        let mut graph = LinkGraph::new();
        UxSpecLoader::new("ux_spec.json")
            .load_value(Path::new("ux_spec.json"), &value, &mut graph)
            .unwrap();
        graph
    }

    #[test]
    fn test_flow_and_screen_edges() {
        let graph = load(json!({
            "personas": [{"id": "PERSONA-1", "name": "Shopper"}],
            "screens": [{"id": "SCREEN-1", "name": "Cart", "user_stories": ["US-4"],
                         "components": [{"id": "COMP-1"}]}],
            "components": [{"id": "COMP-1", "name": "Button"}],
            "user_flows": [{
                "id": "FLOW-1", "name": "Checkout", "persona_id": "PERSONA-1",
                "steps": [{"screen_id": "SCREEN-1"}, {"screen": "SCREEN-2"}, {"action": "pay"}]
            }]
        }));

        assert_eq!(graph.get_link_type("FLOW-1", "PERSONA-1").as_deref(), Some("flow_persona"));
        assert_eq!(graph.get_link_type("FLOW-1", "SCREEN-1").as_deref(), Some("flow_screen"));
        assert_eq!(graph.get_link_type("FLOW-1", "SCREEN-2").as_deref(), Some("flow_screen"));
        assert_eq!(graph.get_link_type("SCREEN-1", "US-4").as_deref(), Some("screen_story"));
        assert_eq!(graph.get_link_type("SCREEN-1", "COMP-1").as_deref(), Some("screen_component"));
        assert_eq!(graph.get_node("PERSONA-1").unwrap().title, "Shopper");
    }

    #[test]
    fn test_information_architecture_entries_are_screens() {
        let graph = load(json!({"information_architecture": [{"id": "SCREEN-9", "title": "Home"}]}));
        assert_eq!(graph.get_node("SCREEN-9").unwrap().node_type, NodeType::Screen);
    }

    #[test]
    fn test_unnamed_and_non_object_entries() {
        let graph = load(json!({"personas": [{"name": "Admin"}, 42, null], "screens": "oops"}));
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains_node("PERSONA-0"));
    }
}
