//! In-memory lineage graph.
//!
//! [`LineageGraph`] is an immutable snapshot of entities and edges. It is
//! built once per session and never structurally modified afterwards; all
//! derived state (highlighting, selection) lives with the caller.
//!
//! Submodules:
//! - [`traversal`]: attribute-scoped connected-path walk
//! - [`impact`]: entity-level upstream/downstream reachability

pub mod impact;
pub mod traversal;

use crate::domain::{AttributeId, Edge, EdgeId, Entity, EntityId};
use crate::error::GraphError;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

pub use impact::{analyze_impact, calculate_impact, Impact, ImpactAnalysis, ImpactLevel};
pub use traversal::{find_connected_path, find_edge_path, ConnectedPath, VisitPolicy};

/// Validated, read-only lineage graph.
///
/// Entities and edges keep their input order. Besides the raw records the
/// graph holds lookup maps and a petgraph index of entity-to-entity edges,
/// where each petgraph edge weight is the id of the lineage edge it mirrors.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    entities: Vec<Entity>,
    edges: Vec<Edge>,
    entity_index: HashMap<EntityId, usize>,
    edge_index: HashMap<EdgeId, usize>,
    attribute_owner: HashMap<AttributeId, EntityId>,
    graph: DiGraph<EntityId, EdgeId>,
    node_map: HashMap<EntityId, NodeIndex>,
}

impl LineageGraph {
    /// Build a graph, enforcing the structural invariants.
    ///
    /// Construction is deliberately stricter than traversal, which never
    /// rejects malformed edges: a `LineageGraph` always satisfies these
    /// invariants. Loaders stay fail-soft by dropping offending records with
    /// a warning in [`crate::source::payload::adapt`] before calling this.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if:
    /// - two entities, two edges, or any two attributes share an id
    /// - an edge endpoint names a missing entity
    /// - an edge attribute does not belong to its endpoint entity
    pub fn new(entities: Vec<Entity>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::with_capacity(entities.len());
        let mut entity_index = HashMap::with_capacity(entities.len());
        let mut attribute_owner = HashMap::new();

        for (position, entity) in entities.iter().enumerate() {
            if entity_index.insert(entity.id.clone(), position).is_some() {
                return Err(GraphError::DuplicateEntity(entity.id.clone()));
            }
            for attribute in &entity.attributes {
                if attribute_owner
                    .insert(attribute.id.clone(), entity.id.clone())
                    .is_some()
                {
                    return Err(GraphError::DuplicateAttribute {
                        attribute: attribute.id.clone(),
                        entity: entity.id.clone(),
                    });
                }
            }
            node_map.insert(entity.id.clone(), graph.add_node(entity.id.clone()));
        }

        let mut edge_index = HashMap::with_capacity(edges.len());
        for (position, edge) in edges.iter().enumerate() {
            if edge_index.insert(edge.id.clone(), position).is_some() {
                return Err(GraphError::DuplicateEdge(edge.id.clone()));
            }
            check_endpoint(edge, &edge.source, edge.source_attribute.as_ref(), &attribute_owner, &node_map)?;
            check_endpoint(edge, &edge.target, edge.target_attribute.as_ref(), &attribute_owner, &node_map)?;

            let from = node_map[&edge.source];
            let to = node_map[&edge.target];
            graph.add_edge(from, to, edge.id.clone());
        }

        Ok(Self {
            entities,
            edges,
            entity_index,
            edge_index,
            attribute_owner,
            graph,
            node_map,
        })
    }

    /// All entities, in input order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All edges, in input order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up an entity by id
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entity_index.get(id).map(|&i| &self.entities[i])
    }

    /// Look up an edge by id
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    /// Whether an entity with this id exists
    pub fn contains_entity(&self, id: &EntityId) -> bool {
        self.entity_index.contains_key(id)
    }

    /// The entity an attribute belongs to
    pub fn owner_of(&self, attribute: &AttributeId) -> Option<&EntityId> {
        self.attribute_owner.get(attribute)
    }

    /// Number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Entity-level petgraph index and the id-to-node map.
    pub(crate) fn index(&self) -> (&DiGraph<EntityId, EdgeId>, &HashMap<EntityId, NodeIndex>) {
        (&self.graph, &self.node_map)
    }
}

fn check_endpoint(
    edge: &Edge,
    entity: &EntityId,
    attribute: Option<&AttributeId>,
    attribute_owner: &HashMap<AttributeId, EntityId>,
    node_map: &HashMap<EntityId, NodeIndex>,
) -> Result<(), GraphError> {
    if !node_map.contains_key(entity) {
        return Err(GraphError::DanglingEdge {
            edge: edge.id.clone(),
            entity: entity.clone(),
        });
    }
    if let Some(attribute) = attribute {
        if attribute_owner.get(attribute) != Some(entity) {
            return Err(GraphError::ForeignAttribute {
                edge: edge.id.clone(),
                attribute: attribute.clone(),
                entity: entity.clone(),
            });
        }
    }
    Ok(())
}
