//! Highlight projection.
//!
//! Maps a [`ConnectedPath`] onto a display-ready view model. The view model is
//! kept apart from the domain records and keyed by id, so discarding a view
//! is all it takes to drop highlighting. Every operation returns a new
//! [`LineageView`]; inputs are never mutated.

use crate::domain::{AttributeId, EdgeId, EntityId, RelationshipType};
use crate::graph::{ConnectedPath, LineageGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stroke width of an edge at rest.
pub const DEFAULT_STROKE_WIDTH: u8 = 2;

/// Stroke width of a highlighted edge.
pub const HIGHLIGHT_STROKE_WIDTH: u8 = 3;

/// Semantic stroke colour of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stroke {
    /// On the highlighted path
    Highlight,
    /// Foreign key at rest
    ForeignKey,
    /// Derivation at rest
    Derived,
    /// Copy at rest
    Copy,
}

/// Visual style of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStyle {
    /// Stroke colour
    pub stroke: Stroke,
    /// Stroke width
    pub width: u8,
    /// Dashed line
    pub dashed: bool,
    /// Flowing animation
    pub animated: bool,
}

impl EdgeStyle {
    /// Resting style for a relationship type.
    ///
    /// Derived edges are dashed and animated even when nothing is highlighted.
    pub fn default_for(relationship: RelationshipType) -> Self {
        match relationship {
            RelationshipType::Fk => Self {
                stroke: Stroke::ForeignKey,
                width: DEFAULT_STROKE_WIDTH,
                dashed: false,
                animated: false,
            },
            RelationshipType::Derived => Self {
                stroke: Stroke::Derived,
                width: DEFAULT_STROKE_WIDTH,
                dashed: true,
                animated: true,
            },
            RelationshipType::Copy => Self {
                stroke: Stroke::Copy,
                width: DEFAULT_STROKE_WIDTH,
                dashed: false,
                animated: false,
            },
        }
    }

    /// Style of an edge on the highlighted path; keeps the dash pattern.
    pub fn highlighted(relationship: RelationshipType) -> Self {
        Self {
            stroke: Stroke::Highlight,
            width: HIGHLIGHT_STROKE_WIDTH,
            animated: true,
            ..Self::default_for(relationship)
        }
    }
}

/// Display state of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeView {
    /// Attribute id
    pub id: AttributeId,
    /// On the highlighted path
    pub is_highlighted: bool,
}

/// Display state of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    /// Entity id
    pub id: EntityId,
    /// On the highlighted path
    pub is_highlighted: bool,
    /// Attribute list shown
    pub is_expanded: bool,
    /// Attribute states, in entity order
    pub attributes: Vec<AttributeView>,
}

/// Display state of one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    /// Edge id
    pub id: EdgeId,
    /// On the highlighted path
    pub is_highlighted: bool,
    /// Current style
    pub style: EdgeStyle,
}

/// Display state of a whole graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageView {
    /// Entity states, in graph order
    pub entities: Vec<EntityView>,
    /// Edge states, in graph order
    pub edges: Vec<EdgeView>,
}

impl LineageView {
    /// A cleared view with every entity collapsed.
    pub fn new(graph: &LineageGraph) -> Self {
        Self::build(graph, &ConnectedPath::default(), &HashSet::new())
    }

    /// Highlight `path`, keeping the expansion state of this view.
    #[must_use]
    pub fn project(&self, graph: &LineageGraph, path: &ConnectedPath) -> Self {
        Self::build(graph, path, &self.expanded_ids())
    }

    /// Drop all highlighting, keeping the expansion state of this view.
    ///
    /// Edges return to the resting style of their relationship type.
    #[must_use]
    pub fn cleared(&self, graph: &LineageGraph) -> Self {
        self.project(graph, &ConnectedPath::default())
    }

    /// Flip the expansion state of one entity. Unknown ids change nothing.
    #[must_use]
    pub fn with_toggled_expansion(&self, id: &EntityId) -> Self {
        let mut view = self.clone();
        if let Some(entity) = view.entities.iter_mut().find(|e| &e.id == id) {
            entity.is_expanded = !entity.is_expanded;
        }
        view
    }

    /// Look up an entity's state
    pub fn entity(&self, id: &EntityId) -> Option<&EntityView> {
        self.entities.iter().find(|e| &e.id == id)
    }

    /// Look up an edge's state
    pub fn edge(&self, id: &EdgeId) -> Option<&EdgeView> {
        self.edges.iter().find(|e| &e.id == id)
    }

    /// Look up an attribute's state, wherever it lives
    pub fn attribute(&self, id: &AttributeId) -> Option<&AttributeView> {
        self.entities
            .iter()
            .flat_map(|e| &e.attributes)
            .find(|a| &a.id == id)
    }

    /// Whether anything is highlighted
    pub fn has_highlight(&self) -> bool {
        self.entities.iter().any(|e| e.is_highlighted) || self.edges.iter().any(|e| e.is_highlighted)
    }

    fn expanded_ids(&self) -> HashSet<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.is_expanded)
            .map(|e| e.id.clone())
            .collect()
    }

    fn build(graph: &LineageGraph, path: &ConnectedPath, expanded: &HashSet<EntityId>) -> Self {
        let entities = graph
            .entities()
            .iter()
            .map(|entity| EntityView {
                id: entity.id.clone(),
                is_highlighted: path.contains_entity(&entity.id),
                is_expanded: expanded.contains(&entity.id),
                attributes: entity
                    .attributes
                    .iter()
                    .map(|attribute| AttributeView {
                        id: attribute.id.clone(),
                        is_highlighted: path.contains_attribute(&attribute.id),
                    })
                    .collect(),
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let is_highlighted = path.contains_edge(&edge.id);
                let style = if is_highlighted {
                    EdgeStyle::highlighted(edge.relationship_type)
                } else {
                    EdgeStyle::default_for(edge.relationship_type)
                };
                EdgeView {
                    id: edge.id.clone(),
                    is_highlighted,
                    style,
                }
            })
            .collect();

        Self { entities, edges }
    }
}

/// Project a path onto a fresh, fully collapsed view.
pub fn project(graph: &LineageGraph, path: &ConnectedPath) -> LineageView {
    LineageView::new(graph).project(graph, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Attribute, Edge, Entity, EntityKind};
    use crate::graph::{find_connected_path, VisitPolicy};

    fn sample() -> LineageGraph {
        LineageGraph::new(
            vec![
                Entity::new("a", "a", EntityKind::Source)
                    .with_attribute(Attribute::new("a1", "id", "int").primary_key())
                    .with_attribute(Attribute::new("a2", "name", "varchar")),
                Entity::new("b", "b", EntityKind::Entity)
                    .with_attribute(Attribute::new("b1", "a_id", "int").foreign_key()),
                Entity::new("c", "c", EntityKind::Derived)
                    .with_attribute(Attribute::new("c1", "name_upper", "varchar")),
            ],
            vec![
                Edge::new("fk", "a", "b").with_attributes("a1", "b1"),
                Edge::new("derived", "a", "c")
                    .with_attributes("a2", "c1")
                    .with_relationship(RelationshipType::Derived),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_project_marks_path_members() {
        let graph = sample();
        let path = find_connected_path(&graph, &"a".into(), Some(&"a1".into()), VisitPolicy::default());
        let view = project(&graph, &path);

        assert!(view.entity(&"a".into()).unwrap().is_highlighted);
        assert!(view.entity(&"b".into()).unwrap().is_highlighted);
        assert!(!view.entity(&"c".into()).unwrap().is_highlighted);
        assert!(view.attribute(&"b1".into()).unwrap().is_highlighted);
        assert!(!view.attribute(&"a2".into()).unwrap().is_highlighted);

        let fk = view.edge(&"fk".into()).unwrap();
        assert_eq!(fk.style, EdgeStyle::highlighted(RelationshipType::Fk));
        assert!(fk.style.animated);
        assert_eq!(fk.style.width, HIGHLIGHT_STROKE_WIDTH);
    }

    #[test]
    fn test_unhighlighted_derived_edge_keeps_animation() {
        let graph = sample();
        let path = find_connected_path(&graph, &"a".into(), Some(&"a1".into()), VisitPolicy::default());
        let view = project(&graph, &path);

        let derived = view.edge(&"derived".into()).unwrap();
        assert!(!derived.is_highlighted);
        assert_eq!(derived.style, EdgeStyle::default_for(RelationshipType::Derived));
        assert!(derived.style.animated);
        assert!(derived.style.dashed);
    }

    #[test]
    fn test_clear_restores_relationship_defaults() {
        let graph = sample();
        let path = find_connected_path(&graph, &"a".into(), None, VisitPolicy::default());
        let highlighted = project(&graph, &path);
        assert!(highlighted.has_highlight());

        let cleared = highlighted.cleared(&graph);
        assert!(!cleared.has_highlight());
        assert!(!cleared.edge(&"fk".into()).unwrap().style.animated);
        assert!(cleared.edge(&"derived".into()).unwrap().style.animated);
        assert_eq!(cleared, LineageView::new(&graph));
        assert_eq!(cleared.cleared(&graph), cleared);
    }

    #[test]
    fn test_projection_does_not_touch_input_view() {
        let graph = sample();
        let base = LineageView::new(&graph);
        let snapshot = base.clone();
        let path = find_connected_path(&graph, &"a".into(), None, VisitPolicy::default());

        let _ = base.project(&graph, &path);
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_expansion_survives_projection_and_clear() {
        let graph = sample();
        let view = LineageView::new(&graph).with_toggled_expansion(&"b".into());
        assert!(view.entity(&"b".into()).unwrap().is_expanded);

        let path = find_connected_path(&graph, &"a".into(), Some(&"a1".into()), VisitPolicy::default());
        let projected = view.project(&graph, &path);
        assert!(projected.entity(&"b".into()).unwrap().is_expanded);
        assert!(projected.cleared(&graph).entity(&"b".into()).unwrap().is_expanded);

        let collapsed = projected.with_toggled_expansion(&"b".into());
        assert!(!collapsed.entity(&"b".into()).unwrap().is_expanded);
        assert_eq!(collapsed.with_toggled_expansion(&"nope".into()), collapsed);
    }

    #[test]
    fn test_copy_edge_style() {
        let style = EdgeStyle::default_for(RelationshipType::Copy);
        assert_eq!(style.stroke, Stroke::Copy);
        assert!(!style.dashed);
        let highlighted = EdgeStyle::highlighted(RelationshipType::Derived);
        assert!(highlighted.dashed);
        assert_eq!(highlighted.stroke, Stroke::Highlight);
    }
}
