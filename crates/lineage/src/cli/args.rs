//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;

use super::validators::{validate_id, validate_limit};

/// Arguments for the `entities` command
#[derive(Parser, Debug, Clone)]
pub struct EntitiesArgs {
    /// Only list entities holding personally identifiable information
    #[arg(long)]
    pub pii_only: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Entity ID to show
    #[arg(value_parser = validate_id)]
    pub entity: String,
}

/// Arguments for the `path` command
#[derive(Parser, Debug, Clone)]
pub struct PathArgs {
    /// Entity ID to start from
    #[arg(value_parser = validate_id)]
    pub entity: String,

    /// Attribute ID to narrow the walk to
    ///
    /// Must belong to the entity. Without it, every edge touching the
    /// entity is followed.
    #[arg(short, long, value_parser = validate_id)]
    pub attribute: Option<String>,
}

/// Arguments for the `edge` command
#[derive(Parser, Debug, Clone)]
pub struct EdgeArgs {
    /// Edge ID to trace through
    #[arg(value_parser = validate_id)]
    pub edge: String,
}

/// Arguments for the `impact` command
#[derive(Parser, Debug, Clone)]
pub struct ImpactArgs {
    /// Entity ID to analyse
    #[arg(value_parser = validate_id)]
    pub entity: String,
}

/// Arguments for the `search` command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Text to look for in entity and attribute names
    ///
    /// Without a term every entity is listed.
    pub term: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long, value_parser = validate_limit)]
    pub limit: Option<usize>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Exit with an error if any record had to be dropped
    #[arg(long)]
    pub strict: bool,
}
