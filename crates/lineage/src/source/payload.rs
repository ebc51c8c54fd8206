//! Wire shapes of an exported lineage graph and their adaptation into the
//! domain model.
//!
//! Adaptation is resilient: a record that would break a graph invariant is
//! dropped and reported as a [`LoadWarning`], and everything else is kept.

use super::LoadWarning;
use crate::domain::{AttributeId, Edge, EdgeId, Entity, EntityId, RelationshipType};
use crate::error::GraphError;
use crate::graph::LineageGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A whole graph as exported for one data model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphPayload {
    /// Entity records
    #[serde(default)]
    pub nodes: Vec<Entity>,

    /// Relationship records
    #[serde(default)]
    pub edges: Vec<EdgePayload>,
}

/// An edge as exported, with attribute scoping tucked into `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgePayload {
    /// Edge id
    pub id: EdgeId,

    /// Upstream entity
    pub source: EntityId,

    /// Downstream entity
    pub target: EntityId,

    /// Relationship name used by older exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,

    /// Attribute scoping and descriptive fields
    #[serde(default)]
    pub metadata: EdgeMetadataPayload,
}

/// Edge metadata as exported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMetadataPayload {
    /// Source-side attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_attribute: Option<AttributeId>,

    /// Target-side attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_attribute: Option<AttributeId>,

    /// `FK`, `DERIVED` or `COPY`; wins over `linkType`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,

    /// Confidence score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Transformation description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_logic: Option<String>,
}

/// One line of a JSONL export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "lowercase")]
pub enum Record {
    /// Entity line
    Node(Entity),
    /// Edge line
    Edge(EdgePayload),
}

/// Adapt payload records into a validated graph.
///
/// Runs in two passes: entities first (dropping repeated entity ids and
/// repeated attribute ids), then edges (dropping repeated ids, dangling
/// endpoints and misplaced attributes). Entity PII flags are raised when any
/// attribute carries PII.
///
/// # Errors
///
/// Never in practice: every record that could violate an invariant has been
/// dropped before the graph is built.
pub fn adapt(
    nodes: Vec<Entity>,
    edges: Vec<EdgePayload>,
    warnings: &mut Vec<LoadWarning>,
) -> Result<LineageGraph, GraphError> {
    let mut entity_ids = HashSet::new();
    let mut attribute_owner: HashMap<AttributeId, EntityId> = HashMap::new();
    let mut entities = Vec::with_capacity(nodes.len());

    for mut entity in nodes {
        if !entity_ids.insert(entity.id.clone()) {
            warnings.push(LoadWarning::DuplicateEntity { entity: entity.id });
            continue;
        }
        let owner = entity.id.clone();
        entity.attributes.retain(|attribute| {
            if attribute_owner.contains_key(&attribute.id) {
                warnings.push(LoadWarning::DuplicateAttribute {
                    attribute: attribute.id.clone(),
                    entity: owner.clone(),
                });
                false
            } else {
                attribute_owner.insert(attribute.id.clone(), owner.clone());
                true
            }
        });
        entity.has_pii = entity.contains_pii();
        entities.push(entity);
    }

    let mut edge_ids = HashSet::new();
    let mut adapted = Vec::with_capacity(edges.len());

    for payload in edges {
        if !edge_ids.insert(payload.id.clone()) {
            warnings.push(LoadWarning::DuplicateEdge { edge: payload.id });
            continue;
        }
        if let Some(warning) = endpoint_warning(&payload, &entity_ids, &attribute_owner) {
            warnings.push(warning);
            continue;
        }

        let relationship_name = payload
            .metadata
            .relationship_type
            .as_deref()
            .or(payload.link_type.as_deref());
        let relationship_type = match relationship_name {
            None => RelationshipType::default(),
            Some(name) => RelationshipType::parse(name).unwrap_or_else(|| {
                warnings.push(LoadWarning::UnknownRelationship {
                    edge: payload.id.clone(),
                    name: name.to_string(),
                });
                RelationshipType::default()
            }),
        };

        adapted.push(Edge {
            id: payload.id,
            source: payload.source,
            target: payload.target,
            source_attribute: payload.metadata.source_attribute,
            target_attribute: payload.metadata.target_attribute,
            relationship_type,
            confidence: payload.metadata.confidence,
            transformation_logic: payload.metadata.transformation_logic,
        });
    }

    LineageGraph::new(entities, adapted)
}

fn endpoint_warning(
    payload: &EdgePayload,
    entity_ids: &HashSet<EntityId>,
    attribute_owner: &HashMap<AttributeId, EntityId>,
) -> Option<LoadWarning> {
    let ends = [
        (&payload.source, payload.metadata.source_attribute.as_ref()),
        (&payload.target, payload.metadata.target_attribute.as_ref()),
    ];
    for (entity, attribute) in ends {
        if !entity_ids.contains(entity) {
            return Some(LoadWarning::DanglingEdge {
                edge: payload.id.clone(),
                entity: entity.clone(),
            });
        }
        if let Some(attribute) = attribute {
            if attribute_owner.get(attribute) != Some(entity) {
                return Some(LoadWarning::ForeignAttribute {
                    edge: payload.id.clone(),
                    attribute: attribute.clone(),
                    entity: entity.clone(),
                });
            }
        }
    }
    None
}
