//! Lineage - attribute-level data lineage graphs.
//!
//! This crate provides both a CLI application and a library for exploring
//! how columns flow between tables: connected-path highlighting, impact
//! analysis and name search over a validated lineage graph.
//!
//! # Example
//!
//! ```
//! use lineage::graph::{find_connected_path, VisitPolicy};
//! use lineage::source::fixture::sample_graph;
//!
//! let graph = sample_graph().unwrap();
//! let path = find_connected_path(&graph, &"3".into(), Some(&"3-2".into()), VisitPolicy::default());
//! assert!(path.contains_entity(&"1".into()));
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod search;
pub mod session;
pub mod source;

// Public CLI module (needed by binary)
pub mod cli;

// Application context
pub mod app;

// Output formatting
pub mod output;

pub use error::{Error, GraphError, Result};
