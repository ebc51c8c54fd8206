//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for lineage using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `entities`: List entities, optionally only those holding PII
//! - `show`: Show entity details and impact
//! - `path`: Highlight everything connected to an entity or attribute
//! - `edge`: Highlight everything connected through an edge
//! - `impact`: Upstream/downstream impact analysis
//! - `search`: Search entity and attribute names
//! - `validate`: Load the graph and report dropped records
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--graph <path>`: Graph file to load (`.json` or `.jsonl`)
//! - `--config <path>`: Configuration file (default: `./lineage.yaml` if present)
//!
//! # Example
//!
//! ```bash
//! lineage --graph model.json path 3 --attribute 3-2
//! lineage impact 1 --json
//! lineage search patient -n 5
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Re-export argument structs
pub use args::{
    EdgeArgs, EntitiesArgs, ImpactArgs, PathArgs, SearchArgs, ShowArgs, ValidateArgs,
};

// Re-export validators for external use
pub use validators::{validate_id, validate_limit};

/// Lineage - attribute-level data lineage explorer
///
/// Trace how columns flow between tables, estimate the blast radius of a
/// change, and search a lineage graph exported as JSON or JSONL.
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Graph file to load instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Configuration file (defaults to ./lineage.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List entities
    ///
    /// Shows every entity in graph order with its kind and attribute count.
    Entities(EntitiesArgs),

    /// Show detailed information about an entity
    ///
    /// Displays metadata, attributes and the upstream/downstream impact.
    Show(ShowArgs),

    /// Trace the connected path from an entity or one of its attributes
    ///
    /// Prints every entity, attribute and edge with its highlight state.
    Path(PathArgs),

    /// Trace the connected path through an edge
    ///
    /// Combines the paths from both ends of an attribute-scoped edge.
    Edge(EdgeArgs),

    /// Show the upstream and downstream impact of an entity
    Impact(ImpactArgs),

    /// Search entity and attribute names
    ///
    /// Results are ranked exact, prefix, then substring match.
    Search(SearchArgs),

    /// Load the graph and report records that had to be dropped
    Validate(ValidateArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Lineage data lineage explorer");
            println!("Use --help for more information");
            return Ok(());
        };

        let mut app = App::load(
            self.graph.as_deref(),
            self.config.as_deref(),
            &std::env::current_dir()?,
        )
        .await?;

        match command {
            Commands::Entities(args) => execute::execute_entities(&mut app, args, output_mode),
            Commands::Show(args) => execute::execute_show(&mut app, args, output_mode),
            Commands::Path(args) => execute::execute_path(&mut app, args, output_mode),
            Commands::Edge(args) => execute::execute_edge(&mut app, args, output_mode),
            Commands::Impact(args) => execute::execute_impact(&mut app, args, output_mode),
            Commands::Search(args) => execute::execute_search(&app, args, output_mode),
            Commands::Validate(args) => execute::execute_validate(&app, args, output_mode),
        }
    }
}
