//! Pulling node IDs out of artifact content.

use linkgraph_loaders::loaders::diagrams::split_stem;
use linkgraph_loaders::loaders::epics::parse_sections;
use linkgraph_loaders::loaders::requirements::requirement_mapping;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

static RE_ID_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][A-Z0-9]*)-(\d+)\b").unwrap());

static RE_WHOLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][A-Z0-9]*)-(\d+)$").unwrap());

/// Records of a structured file keyed by ID.
pub type Records = BTreeMap<String, Value>;

/// Every ID-like token (`PREFIX-123`) in `text`.
pub fn id_tokens(text: &str) -> BTreeSet<String> {
    RE_ID_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// IDs of `##`/`###` sections present in both texts whose body differs.
pub fn changed_sections(old: &str, new: &str) -> BTreeSet<String> {
    let old_bodies: BTreeMap<String, String> = parse_sections(old)
        .into_iter()
        .map(|section| (section.id, section.body))
        .collect();

    parse_sections(new)
        .into_iter()
        .filter(|section| {
            old_bodies
                .get(&section.id)
                .is_some_and(|body| *body != section.body)
        })
        .map(|section| section.id)
        .collect()
}

/// Requirement IDs on the tag (`@REQ-1`) and comment (`# REQ-1`) lines of a
/// feature file. Only tokens whose prefix is in `requirement_prefixes` count.
pub fn feature_references(text: &str, requirement_prefixes: &BTreeSet<String>) -> BTreeSet<String> {
    text.lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with('@') || line.starts_with('#'))
        .flat_map(id_tokens)
        .filter(|id| {
            id.split_once('-')
                .is_some_and(|(prefix, _)| requirement_prefixes.contains(prefix))
        })
        .collect()
}

/// Subject ID of a diagram file, if the stem starts with a known ID.
pub fn diagram_subject(path: &Path, known_prefixes: &BTreeSet<String>) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let (subject, _) = split_stem(stem);
    let caps = RE_WHOLE_ID.captures(subject)?;
    known_prefixes
        .contains(&caps[1])
        .then(|| subject.to_string())
}

/// Records of a requirement-style mapping document.
pub fn mapping_records(value: &Value, key: &str) -> Option<Records> {
    let mapping = requirement_mapping(value, key)?;
    Some(mapping.iter().map(|(id, record)| (id.clone(), record.clone())).collect())
}

/// Records with an `id` in a list document: a bare array, or every array
/// at the top level of an object.
pub fn list_records(value: &Value) -> Option<Records> {
    let arrays: Vec<&Vec<Value>> = match value {
        Value::Array(items) => vec![items],
        Value::Object(root) => root.values().filter_map(Value::as_array).collect(),
        _ => return None,
    };

    let mut records = Records::new();
    for item in arrays.into_iter().flatten() {
        if let Some(id) = item.get("id").and_then(Value::as_str) {
            records.insert(id.to_string(), item.clone());
        }
    }
    Some(records)
}

/// Keys in exactly one side, plus keys whose record differs.
///
/// Objects compare without regard to key order.
pub fn changed_records(old: &Records, new: &Records) -> BTreeSet<String> {
    let mut changed: BTreeSet<String> = BTreeSet::new();
    for (id, record) in old {
        match new.get(id) {
            Some(other) if other == record => {}
            _ => {
                changed.insert(id.clone());
            }
        }
    }
    for id in new.keys() {
        if !old.contains_key(id) {
            changed.insert(id.clone());
        }
    }
    changed
}

/// Symmetric difference of two sets.
pub fn symmetric_difference(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.symmetric_difference(b).cloned().collect()
}
