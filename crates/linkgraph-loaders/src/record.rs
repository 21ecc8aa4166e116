//! Field access on loosely shaped JSON records.
//!
//! Artifact files are only best-effort structured: absent fields read as
//! empty, and ID lists accept a single string, an array of strings, or an
//! array of objects with an `id`.

use linkgraph::{LinkGraph, NodeType};
use serde_json::{Map, Value};

/// First non-empty string among `keys`.
pub fn str_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// All IDs listed under any of `keys`, in order, without duplicates.
pub fn id_list(record: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for key in keys {
        let Some(value) = record.get(*key) else {
            continue;
        };
        for id in ids_in(value) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// IDs held by a single value: a comma separated string or an array.
pub fn ids_in(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_ids(s),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(obj) => str_field(obj, &["id"]),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Split a comma separated ID list, dropping blanks and surrounding brackets.
pub fn split_ids(text: &str) -> Vec<String> {
    text.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Explicit `id` of a record, or `{PREFIX}-{current node count}`.
///
/// Synthetic IDs depend on how many nodes were loaded before this item, so
/// they change when the load order or earlier sources change.
pub fn record_id(record: &Map<String, Value>, node_type: NodeType, graph: &LinkGraph) -> String {
    str_field(record, &["id"]).unwrap_or_else(|| synthetic_id(node_type, graph))
}

/// `{PREFIX}-{current node count}` for an item without an ID.
pub fn synthetic_id(node_type: NodeType, graph: &LinkGraph) -> String {
    format!("{}-{}", node_type.synthetic_prefix(), graph.node_count())
}

/// Objects of an array, skipping anything that is not an object.
pub fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}
