//! Graph sources.
//!
//! A lineage graph arrives from outside: an exported payload on disk, or the
//! built-in sample. Sources adapt what they read into a validated
//! [`LineageGraph`], reporting anything they had to drop as [`LoadWarning`]s
//! rather than failing the whole load.
//!
//! # Formats
//!
//! - `*.jsonl`: one record per line, tagged `"record": "node"` or
//!   `"record": "edge"`. Malformed lines are skipped with a warning.
//! - anything else: a single JSON document `{ "nodes": [...], "edges": [...] }`.

pub mod fixture;
pub mod payload;

use crate::domain::{AttributeId, EdgeId, EntityId};
use crate::error::{Error, Result};
use crate::graph::LineageGraph;
use async_trait::async_trait;
use payload::{adapt, GraphPayload, Record};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Non-fatal problems found while loading a graph.
///
/// The offending record is dropped and loading continues; the resulting graph
/// always satisfies the graph invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// A JSONL line could not be parsed.
    ///
    /// **Effect**: the line is skipped entirely.
    MalformedJson { line_number: usize, error: String },

    /// An entity id appeared more than once.
    ///
    /// **Effect**: later occurrences are skipped.
    DuplicateEntity { entity: EntityId },

    /// An attribute id appeared more than once across the graph.
    ///
    /// **Effect**: the later attribute is removed from its entity.
    DuplicateAttribute { attribute: AttributeId, entity: EntityId },

    /// An edge id appeared more than once.
    ///
    /// **Effect**: later occurrences are skipped.
    DuplicateEdge { edge: EdgeId },

    /// An edge endpoint names an entity that was not loaded.
    ///
    /// **Effect**: the edge is skipped.
    DanglingEdge { edge: EdgeId, entity: EntityId },

    /// An edge attribute does not belong to its endpoint entity.
    ///
    /// **Effect**: the edge is skipped.
    ForeignAttribute {
        edge: EdgeId,
        attribute: AttributeId,
        entity: EntityId,
    },

    /// An edge names an unknown relationship type.
    ///
    /// **Effect**: the edge is kept as a foreign key.
    UnknownRelationship { edge: EdgeId, name: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::MalformedJson { line_number, error } => {
                write!(f, "skipped malformed line {line_number}: {error}")
            }
            LoadWarning::DuplicateEntity { entity } => {
                write!(f, "skipped duplicate entity {entity}")
            }
            LoadWarning::DuplicateAttribute { attribute, entity } => {
                write!(f, "dropped duplicate attribute {attribute} from entity {entity}")
            }
            LoadWarning::DuplicateEdge { edge } => write!(f, "skipped duplicate edge {edge}"),
            LoadWarning::DanglingEdge { edge, entity } => {
                write!(f, "skipped edge {edge}: entity {entity} does not exist")
            }
            LoadWarning::ForeignAttribute {
                edge,
                attribute,
                entity,
            } => write!(
                f,
                "skipped edge {edge}: attribute {attribute} does not belong to entity {entity}"
            ),
            LoadWarning::UnknownRelationship { edge, name } => {
                write!(f, "edge {edge} has unknown relationship '{name}', treating as FK")
            }
        }
    }
}

/// A loaded graph together with everything that was dropped on the way.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    /// The validated graph
    pub graph: LineageGraph,
    /// Non-fatal loading problems
    pub warnings: Vec<LoadWarning>,
}

/// Something a lineage graph can be loaded from.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Load and adapt the graph.
    async fn load(&self) -> Result<LoadedGraph>;

    /// Short human-readable description, for logs and `validate` output.
    fn describe(&self) -> String;
}

/// The built-in sample graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

#[async_trait]
impl GraphSource for FixtureSource {
    async fn load(&self) -> Result<LoadedGraph> {
        Ok(LoadedGraph {
            graph: fixture::sample_graph()?,
            warnings: Vec::new(),
        })
    }

    fn describe(&self) -> String {
        "built-in sample graph".to_string()
    }
}

/// A graph export on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_jsonl(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"))
    }
}

#[async_trait]
impl GraphSource for FileSource {
    async fn load(&self) -> Result<LoadedGraph> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut warnings = Vec::new();

        let payload = if self.is_jsonl() {
            parse_jsonl(&content, &mut warnings)
        } else {
            serde_json::from_str::<GraphPayload>(&content).map_err(|source| Error::Payload {
                path: self.path.clone(),
                source,
            })?
        };

        let graph = adapt(payload.nodes, payload.edges, &mut warnings)?;
        for warning in &warnings {
            tracing::warn!(path = %self.path.display(), %warning, "Graph load warning");
        }
        tracing::debug!(
            path = %self.path.display(),
            entities = graph.entity_count(),
            edges = graph.edge_count(),
            "Graph loaded"
        );

        Ok(LoadedGraph { graph, warnings })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse JSONL records, skipping blank and malformed lines.
fn parse_jsonl(content: &str, warnings: &mut Vec<LoadWarning>) -> GraphPayload {
    let mut payload = GraphPayload::default();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Record>(line) {
            Ok(Record::Node(entity)) => payload.nodes.push(entity),
            Ok(Record::Edge(edge)) => payload.edges.push(edge),
            Err(e) => warnings.push(LoadWarning::MalformedJson {
                line_number: index + 1,
                error: e.to_string(),
            }),
        }
    }

    payload
}
