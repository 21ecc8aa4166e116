//! Task list with an optional dependency mapping.
//!
//! ```json
//! {
//!   "tasks": [{"id": "TASK-1", "story_id": "US-1", "depends_on": ["TASK-0"]}],
//!   "dependency_graph": {"TASK-2": ["TASK-1"]}
//! }
//! ```

use crate::errors::{LoaderError, LoaderResult};
use crate::record::{id_list, ids_in, objects, record_id, str_field};
use crate::traits::{load_json_file, ArtifactLoader, LoadContext, SourceStatus};
use linkgraph::{LinkGraph, Node, NodeDetails, NodeType};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Loads task nodes with parent pointers, dependencies and blocks
pub struct TasksLoader {
    file: String,
}

impl TasksLoader {
    /// Loader for `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Add every task of an already parsed document to the graph
    ///
    /// A bare array is accepted as the task list.
    pub fn load_value(&self, path: &Path, value: &Value, graph: &mut LinkGraph) -> LoaderResult<()> {
        let (tasks, dependency_graph) = match value {
            Value::Array(_) => (Some(value), None),
            Value::Object(root) => (root.get("tasks"), root.get("dependency_graph")),
            _ => {
                return Err(LoaderError::InvalidShape(
                    path.to_path_buf(),
                    "expected a task list".to_string(),
                ))
            }
        };

        for task in objects(tasks) {
            load_task(task, graph);
        }

        if let Some(mapping) = dependency_graph.and_then(Value::as_object) {
            for (task_id, deps) in mapping {
                for dep in ids_in(deps) {
                    graph.add_edge(task_id, &dep, "task_dependency");
                }
            }
        }
        Ok(())
    }
}

fn load_task(task: &Map<String, Value>, graph: &mut LinkGraph) {
    let id = record_id(task, NodeType::Task, graph);
    let depends_on = id_list(task, &["depends_on", "dependencies"]);

    let node = Node::new(
        &id,
        NodeType::Task,
        str_field(task, &["title", "name"]).unwrap_or_else(|| id.clone()),
    )
    .with_description(str_field(task, &["description"]).unwrap_or_default())
    .with_details(NodeDetails::Task {
        status: str_field(task, &["status"]),
        depends_on: depends_on.clone(),
    })
    .with_data(task.clone());
    graph.add_node(node);

    if let Some(feature) = str_field(task, &["feature_id"]) {
        graph.add_edge(&id, &feature, "task_feature");
    }
    if let Some(story) = str_field(task, &["story_id", "user_story_id"]) {
        graph.add_edge(&id, &story, "task_story");
    }
    if let Some(req) = str_field(task, &["requirement_id"]) {
        graph.add_edge(&id, &req, "task_requirement");
    }
    for dep in &depends_on {
        graph.add_edge(&id, dep, "task_dependency");
    }
    for blocked in id_list(task, &["blocks"]) {
        graph.add_edge(&id, &blocked, "task_blocks");
    }
}

impl ArtifactLoader for TasksLoader {
    fn name(&self) -> &str {
        "tasks"
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
