//! Unit tests for the link graph public API.

mod graph_ops_test;
mod traversal_test;
