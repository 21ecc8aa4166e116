//! Linkgraph Resolver
//!
//! Maps a changed artifact file to the node IDs whose content changed.
//! The resolver keeps the last seen content of every path, so consecutive
//! calls compare against each other.
//!
//! # Example
//!
//! ```rust
//! use linkgraph_resolver::ChangeResolver;
//! use std::path::Path;
//!
//! let mut resolver = ChangeResolver::default();
//! let path = Path::new("requirements.json");
//! resolver.prime(path, r#"{"requirements": {"REQ-1": {"title": "Login"}}}"#);
//!
//! let event = resolver.resolve(
//!     path,
//!     None,
//!     Some(r#"{"requirements": {"REQ-1": {"title": "Sign in"}}}"#.to_string()),
//! );
//! assert_eq!(event.affected_ids, vec!["REQ-1".to_string()]);
//! ```

pub mod diff;
pub mod error;
pub mod extract;
pub mod file_type;
pub mod resolver;

pub use diff::LineDiff;
pub use error::{ResolveError, Result};
pub use file_type::{FileType, FileTypeTable};
pub use resolver::{ChangeEvent, ChangeKind, ChangeResolver};
