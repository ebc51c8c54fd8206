//! Attribute-scoped connected-path traversal.
//!
//! Starting from a seed entity (and optionally one of its attributes), the
//! walk follows edges both upstream and downstream. With an attribute
//! context only edges whose near-side attribute matches are followed; the
//! far-side attribute then becomes the context for the next step.
//!
//! # Edge Direction Reminder
//!
//! - Edges point from **upstream -> downstream** (`source` feeds `target`)
//! - Upstream match: `edge.target` is the current entity, walk to `edge.source`
//! - Downstream match: `edge.source` is the current entity, walk to `edge.target`

use super::LineageGraph;
use crate::domain::{AttributeId, EdgeId, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// How the walk decides that a node has already been expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitPolicy {
    /// Expand each entity once, whatever attribute it was reached through.
    ///
    /// An entity re-entered under a different attribute is added to the path
    /// but not expanded again, so what lies beyond the second attribute
    /// depends on edge order.
    #[default]
    PerEntity,

    /// Expand each (entity, attribute context) pair once.
    ///
    /// An entity reached again through a different attribute is expanded
    /// again for that attribute. Selected with `visit-policy: per-attribute`.
    PerAttribute,
}

impl VisitPolicy {
    fn key<'g>(
        self,
        entity: &'g EntityId,
        attribute: Option<&'g AttributeId>,
    ) -> (&'g EntityId, Option<&'g AttributeId>) {
        match self {
            VisitPolicy::PerAttribute => (entity, attribute),
            VisitPolicy::PerEntity => (entity, None),
        }
    }
}

/// Everything reached by a traversal.
///
/// Sets are ordered so that output built from them is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPath {
    /// Reached entities, including the seed
    pub entities: BTreeSet<EntityId>,

    /// Edges that were followed
    pub edges: BTreeSet<EdgeId>,

    /// Reached attributes, including the seed attribute if any
    pub attributes: BTreeSet<AttributeId>,
}

impl ConnectedPath {
    /// A path holding only the seed.
    pub fn seed(entity: &EntityId, attribute: Option<&AttributeId>) -> Self {
        Self {
            entities: BTreeSet::from([entity.clone()]),
            edges: BTreeSet::new(),
            attributes: attribute.into_iter().cloned().collect(),
        }
    }

    /// Whether the entity is on the path
    pub fn contains_entity(&self, id: &EntityId) -> bool {
        self.entities.contains(id)
    }

    /// Whether the edge is on the path
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains(id)
    }

    /// Whether the attribute is on the path
    pub fn contains_attribute(&self, id: &AttributeId) -> bool {
        self.attributes.contains(id)
    }

    /// True when nothing at all is highlighted
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.edges.is_empty() && self.attributes.is_empty()
    }

    /// Merge another path into this one.
    #[must_use]
    pub fn union(mut self, other: ConnectedPath) -> Self {
        self.entities.extend(other.entities);
        self.edges.extend(other.edges);
        self.attributes.extend(other.attributes);
        self
    }
}

/// One pending expansion on the explicit DFS stack.
///
/// `cursor` walks (edge, direction) pairs: `2 * i` is the upstream check of
/// edge `i`, `2 * i + 1` its downstream check.
struct Frame<'g> {
    entity: &'g EntityId,
    attribute: Option<&'g AttributeId>,
    cursor: usize,
}

/// Find every entity, edge and attribute connected to the seed.
///
/// Every edge of the graph is scanned for each expanded node, upstream check
/// before downstream check, and a newly reached node is expanded before the
/// scan continues. This is a depth-first walk on an explicit stack, so deep
/// chains never grow the call stack.
///
/// An unknown seed entity, or a seed attribute that does not belong to the
/// seed entity, yields the seed-only path. Edges are never required to be
/// acyclic; the visited set guarantees termination.
pub fn find_connected_path(
    graph: &LineageGraph,
    seed_entity: &EntityId,
    seed_attribute: Option<&AttributeId>,
    policy: VisitPolicy,
) -> ConnectedPath {
    let mut path = ConnectedPath::seed(seed_entity, seed_attribute);

    let Some(entity) = graph.entity(seed_entity) else {
        debug!(entity = %seed_entity, "Unknown seed entity, returning seed-only path");
        return path;
    };
    let attribute = match seed_attribute {
        Some(id) => match entity.attribute(id) {
            Some(attribute) => Some(&attribute.id),
            None => {
                debug!(entity = %seed_entity, attribute = %id, "Seed attribute not on seed entity, returning seed-only path");
                return path;
            }
        },
        None => None,
    };

    let edges = graph.edges();
    let mut visited: HashSet<(&EntityId, Option<&AttributeId>)> = HashSet::new();
    visited.insert(policy.key(&entity.id, attribute));
    let mut stack = vec![Frame {
        entity: &entity.id,
        attribute,
        cursor: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(edge) = edges.get(frame.cursor / 2) else {
            stack.pop();
            continue;
        };
        let upstream = frame.cursor % 2 == 0;
        frame.cursor += 1;
        let (current, context) = (frame.entity, frame.attribute);

        let (near, near_attribute, far, far_attribute) = if upstream {
            (
                &edge.target,
                edge.target_attribute.as_ref(),
                &edge.source,
                edge.source_attribute.as_ref(),
            )
        } else {
            (
                &edge.source,
                edge.source_attribute.as_ref(),
                &edge.target,
                edge.target_attribute.as_ref(),
            )
        };

        if near != current {
            continue;
        }
        if context.is_some() && near_attribute != context {
            continue;
        }

        path.edges.insert(edge.id.clone());
        path.entities.insert(far.clone());

        // Entity-level far side: the entity is reached but not expanded.
        if let Some(far_attribute) = far_attribute {
            path.attributes.insert(far_attribute.clone());
            if visited.insert(policy.key(far, Some(far_attribute))) {
                stack.push(Frame {
                    entity: far,
                    attribute: Some(far_attribute),
                    cursor: 0,
                });
            }
        }
    }

    debug!(
        entity = %seed_entity,
        entities = path.entities.len(),
        edges = path.edges.len(),
        attributes = path.attributes.len(),
        expanded = visited.len(),
        "Connected path computed"
    );
    path
}

/// Find the path through an attribute-scoped edge.
///
/// The result is the union of the paths seeded at both ends of the edge.
/// Returns `None` for unknown edges and for entity-level edges, which carry
/// no attribute to seed from.
pub fn find_edge_path(
    graph: &LineageGraph,
    edge_id: &EdgeId,
    policy: VisitPolicy,
) -> Option<ConnectedPath> {
    let edge = graph.edge(edge_id)?;
    let (Some(source_attribute), Some(target_attribute)) =
        (&edge.source_attribute, &edge.target_attribute)
    else {
        debug!(edge = %edge_id, "Edge is not attribute-scoped, nothing to trace");
        return None;
    };

    let upstream = find_connected_path(graph, &edge.source, Some(source_attribute), policy);
    let downstream = find_connected_path(graph, &edge.target, Some(target_attribute), policy);
    Some(upstream.union(downstream))
}
