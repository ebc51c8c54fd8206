//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that resolves configuration, picks a
//! graph source, loads the graph and wraps it in a [`LineageSession`].
//!
//! # Example
//!
//! ```no_run
//! use lineage::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::load(None, None, Path::new(".")).await?;
//!     println!("{} entities", app.session().graph().entity_count());
//!     Ok(())
//! }
//! ```

use crate::config::LineageConfig;
use crate::error::Result;
use crate::session::LineageSession;
use crate::source::{FileSource, FixtureSource, GraphSource, LoadWarning};
use std::path::Path;

/// Application context for CLI operations.
pub struct App {
    /// Highlight and selection state over the loaded graph
    session: LineageSession,

    /// Where the graph came from
    source: String,

    /// Records dropped while loading
    warnings: Vec<LoadWarning>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("source", &self.source)
            .field("entities", &self.session.graph().entity_count())
            .field("edges", &self.session.graph().edge_count())
            .field("warnings", &self.warnings.len())
            .finish()
    }
}

impl App {
    /// Resolve configuration and load the graph.
    ///
    /// # Arguments
    ///
    /// * `graph` - Explicit graph file (`--graph`), overriding the configuration
    /// * `config` - Explicit configuration file (`--config`)
    /// * `working_dir` - Directory searched for an implicit `lineage.yaml`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicit configuration file cannot be read or parsed
    /// - The graph file cannot be read or is not a valid payload
    pub async fn load(graph: Option<&Path>, config: Option<&Path>, working_dir: &Path) -> Result<Self> {
        let config = LineageConfig::resolve(config, working_dir).await?;
        let source = select_source(graph, &config);
        tracing::info!(source = %source.describe(), "Loading lineage graph");

        let loaded = source.load().await?;
        Ok(Self {
            session: LineageSession::new(loaded.graph, config.traversal.visit_policy),
            source: source.describe(),
            warnings: loaded.warnings,
        })
    }

    /// Get an immutable reference to the session.
    pub fn session(&self) -> &LineageSession {
        &self.session
    }

    /// Get a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut LineageSession {
        &mut self.session
    }

    /// Description of the graph source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Records dropped while loading.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }
}

/// Pick the graph source: `--graph`, then `source.graph-file`, then the
/// built-in sample.
pub fn select_source(graph: Option<&Path>, config: &LineageConfig) -> Box<dyn GraphSource> {
    match graph.or(config.source.graph_file.as_deref()) {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(FixtureSource),
    }
}
