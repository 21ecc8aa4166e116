//! Graph export.
//!
//! - [`export_json`]: nodes and edges as a single JSON document

mod json;

pub use json::{export_json, export_value};
