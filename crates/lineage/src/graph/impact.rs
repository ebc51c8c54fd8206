//! Entity-level impact analysis.
//!
//! Unlike the connected-path walk, impact analysis ignores attributes
//! entirely: it counts every entity transitively upstream (feeding into) and
//! downstream (fed by) the root entity. The two walks are independent, each
//! with its own visited set seeded with the root, so the root itself is
//! never counted.

use super::traversal::ConnectedPath;
use super::LineageGraph;
use crate::domain::{EdgeId, EntityId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Highest affected-entity count still rated [`ImpactLevel::Low`].
const LOW_IMPACT_MAX: usize = 2;

/// Highest affected-entity count still rated [`ImpactLevel::Medium`].
const MEDIUM_IMPACT_MAX: usize = 5;

/// Highest affected-entity count still rated [`ImpactLevel::High`].
const HIGH_IMPACT_MAX: usize = 10;

/// Upstream and downstream entity counts for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    /// Entities feeding into the root, transitively
    pub upstream_count: usize,

    /// Entities fed by the root, transitively
    pub downstream_count: usize,
}

/// Coarse rating of how far a change to an entity would reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    /// At most two other entities affected
    Low,
    /// Three to five
    Medium,
    /// Six to ten
    High,
    /// More than ten
    Critical,
}

impl ImpactLevel {
    /// Rate a number of distinct affected entities.
    pub fn from_affected(affected: usize) -> Self {
        match affected {
            0..=LOW_IMPACT_MAX => ImpactLevel::Low,
            n if n <= MEDIUM_IMPACT_MAX => ImpactLevel::Medium,
            n if n <= HIGH_IMPACT_MAX => ImpactLevel::High,
            _ => ImpactLevel::Critical,
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
            ImpactLevel::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Full impact analysis for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    /// The analysed entity
    pub root_entity: EntityId,

    /// Entities upstream of the root, sorted by id
    pub upstream: Vec<EntityId>,

    /// Entities downstream of the root, sorted by id
    pub downstream: Vec<EntityId>,

    /// Edges crossed by either walk
    pub edges: BTreeSet<EdgeId>,

    /// Rating based on the distinct affected entities
    pub estimated_impact: ImpactLevel,
}

impl ImpactAnalysis {
    fn empty(root: &EntityId) -> Self {
        Self {
            root_entity: root.clone(),
            upstream: Vec::new(),
            downstream: Vec::new(),
            edges: BTreeSet::new(),
            estimated_impact: ImpactLevel::Low,
        }
    }

    /// The upstream/downstream counts
    pub fn impact(&self) -> Impact {
        Impact {
            upstream_count: self.upstream.len(),
            downstream_count: self.downstream.len(),
        }
    }

    /// Distinct entities on either side of the root, sorted by id.
    ///
    /// In a cyclic graph an entity can be both upstream and downstream; it is
    /// listed once.
    pub fn affected_entities(&self) -> Vec<EntityId> {
        let affected: BTreeSet<&EntityId> = self.upstream.iter().chain(&self.downstream).collect();
        affected.into_iter().cloned().collect()
    }

    /// Convert into a highlightable path: root, affected entities and edges.
    pub fn to_path(&self) -> ConnectedPath {
        let mut path = ConnectedPath::seed(&self.root_entity, None);
        path.entities.extend(self.upstream.iter().cloned());
        path.entities.extend(self.downstream.iter().cloned());
        path.edges.extend(self.edges.iter().cloned());
        path
    }
}

/// Count the entities transitively upstream and downstream of `entity`.
///
/// Unknown entities have no impact.
pub fn calculate_impact(graph: &LineageGraph, entity: &EntityId) -> Impact {
    analyze_impact(graph, entity).impact()
}

/// Run both impact walks and collect the reached entities and edges.
pub fn analyze_impact(graph: &LineageGraph, entity: &EntityId) -> ImpactAnalysis {
    let (index, node_map) = graph.index();
    let Some(&start) = node_map.get(entity) else {
        tracing::debug!(entity = %entity, "Unknown entity, reporting no impact");
        return ImpactAnalysis::empty(entity);
    };

    let mut edges = BTreeSet::new();
    let upstream = walk(index, start, Direction::Incoming, &mut edges);
    let downstream = walk(index, start, Direction::Outgoing, &mut edges);

    let affected: HashSet<&EntityId> = upstream.iter().chain(&downstream).collect();
    let estimated_impact = ImpactLevel::from_affected(affected.len());

    tracing::debug!(
        entity = %entity,
        upstream = upstream.len(),
        downstream = downstream.len(),
        level = %estimated_impact,
        "Impact computed"
    );

    ImpactAnalysis {
        root_entity: entity.clone(),
        upstream,
        downstream,
        edges,
        estimated_impact,
    }
}

/// Depth-first walk in one direction, excluding the start node.
///
/// `Incoming` follows edges whose target is the current node to their
/// source (upstream); `Outgoing` follows source to target (downstream).
fn walk(
    index: &DiGraph<EntityId, EdgeId>,
    start: NodeIndex,
    direction: Direction,
    edges: &mut BTreeSet<EdgeId>,
) -> Vec<EntityId> {
    let mut visited = HashSet::from([start]);
    let mut stack = vec![start];
    let mut reached = Vec::new();

    while let Some(node) = stack.pop() {
        for edge in index.edges_directed(node, direction) {
            let next = match direction {
                Direction::Incoming => edge.source(),
                Direction::Outgoing => edge.target(),
            };
            edges.insert(edge.weight().clone());
            if visited.insert(next) {
                reached.push(index[next].clone());
                stack.push(next);
            }
        }
    }

    reached.sort();
    reached
}
