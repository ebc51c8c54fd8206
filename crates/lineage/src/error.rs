//! Error types for lineage operations.
//!
//! Traversal, impact analysis and highlight projection never fail; unknown
//! seeds produce degenerate results instead. Errors only arise while
//! building or loading a graph, reading configuration, or resolving ids
//! given on the command line.

use crate::domain::{AttributeId, EdgeId, EntityId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for lineage operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A graph payload could not be decoded.
    #[error("Invalid graph payload in {}: {source}", path.display())]
    Payload {
        /// File the payload was read from
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// The graph violates a structural invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Entity not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Attribute not found on the given entity.
    #[error("Attribute {attribute} not found on entity {entity}")]
    AttributeNotFound {
        /// Entity that was searched
        entity: EntityId,
        /// Attribute that was requested
        attribute: AttributeId,
    },

    /// Edge not found.
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),
}

/// Structural invariant violations detected while building a [`LineageGraph`].
///
/// [`LineageGraph`]: crate::graph::LineageGraph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two entities share an id.
    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    /// Two attributes share an id, possibly on different entities.
    #[error("Duplicate attribute id {attribute} (on entity {entity})")]
    DuplicateAttribute {
        /// The repeated attribute id
        attribute: AttributeId,
        /// Entity holding the second occurrence
        entity: EntityId,
    },

    /// Two edges share an id.
    #[error("Duplicate edge id: {0}")]
    DuplicateEdge(EdgeId),

    /// An edge endpoint names a missing entity.
    #[error("Edge {edge} references missing entity {entity}")]
    DanglingEdge {
        /// The offending edge
        edge: EdgeId,
        /// The missing entity
        entity: EntityId,
    },

    /// An edge attribute does not belong to its endpoint entity.
    #[error("Edge {edge} names attribute {attribute}, which does not belong to entity {entity}")]
    ForeignAttribute {
        /// The offending edge
        edge: EdgeId,
        /// The misplaced attribute
        attribute: AttributeId,
        /// The endpoint entity
        entity: EntityId,
    },
}

/// A specialized Result type for lineage operations.
pub type Result<T> = std::result::Result<T, Error>;
