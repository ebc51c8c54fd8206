//! Interactive lineage session.
//!
//! A [`LineageSession`] owns the graph together with whatever the user is
//! currently looking at: the highlighted view, the selection, and the impact
//! of the selected entity. Each interaction replaces the previous state
//! wholesale; nothing is queued or merged.

use crate::domain::{AttributeId, Edge, EdgeId, Entity, EntityId};
use crate::graph::{analyze_impact, find_connected_path, find_edge_path};
use crate::graph::{ConnectedPath, ImpactAnalysis, LineageGraph, VisitPolicy};
use crate::highlight::LineageView;
use serde::Serialize;

/// What is currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected
    #[default]
    None,
    /// An entity, via a click or a search hit
    Entity(EntityId),
    /// An edge
    Edge(EdgeId),
}

/// Contents of the details panel for the current selection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "selection", rename_all = "lowercase")]
pub enum Details<'a> {
    /// An entity and its impact
    Entity {
        /// The selected entity
        entity: &'a Entity,
        /// Its upstream/downstream reach
        impact: &'a ImpactAnalysis,
    },
    /// An edge and its endpoints
    Edge {
        /// The selected edge
        edge: &'a Edge,
        /// Upstream entity
        source: &'a Entity,
        /// Downstream entity
        target: &'a Entity,
    },
}

/// Caller-owned highlight and selection state over one graph.
#[derive(Debug, Clone)]
pub struct LineageSession {
    graph: LineageGraph,
    policy: VisitPolicy,
    view: LineageView,
    path: ConnectedPath,
    selection: Selection,
    impact: Option<ImpactAnalysis>,
    pii_only: bool,
}

impl LineageSession {
    /// Start a session with nothing highlighted or selected.
    pub fn new(graph: LineageGraph, policy: VisitPolicy) -> Self {
        let view = LineageView::new(&graph);
        Self {
            graph,
            policy,
            view,
            path: ConnectedPath::default(),
            selection: Selection::None,
            impact: None,
            pii_only: false,
        }
    }

    /// The underlying graph
    pub fn graph(&self) -> &LineageGraph {
        &self.graph
    }

    /// The current view
    pub fn view(&self) -> &LineageView {
        &self.view
    }

    /// The currently highlighted path
    pub fn path(&self) -> &ConnectedPath {
        &self.path
    }

    /// The current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Impact of the selected entity, if an entity is selected
    pub fn impact(&self) -> Option<&ImpactAnalysis> {
        self.impact.as_ref()
    }

    /// Highlight everything connected to one attribute and select its entity.
    ///
    /// The highlight is applied even when the entity is unknown (it then
    /// covers just the seed); the selection only changes for known entities.
    pub fn click_attribute(&mut self, entity: &EntityId, attribute: &AttributeId) -> &ConnectedPath {
        self.trace(entity, Some(attribute))
    }

    /// Highlight a connected path seeded at an entity, optionally narrowed
    /// to one of its attributes, and select the entity.
    ///
    /// Without an attribute the walk starts in entity context and follows
    /// every edge touching the entity.
    pub fn trace(&mut self, entity: &EntityId, attribute: Option<&AttributeId>) -> &ConnectedPath {
        let path = find_connected_path(&self.graph, entity, attribute, self.policy);
        self.apply(path);
        if self.graph.contains_entity(entity) {
            self.select(entity);
        }
        &self.path
    }

    /// Highlight everything connected through an edge and select it.
    ///
    /// Entity-level and unknown edges leave the session untouched and return
    /// `None`.
    pub fn click_edge(&mut self, edge: &EdgeId) -> Option<&ConnectedPath> {
        let path = find_edge_path(&self.graph, edge, self.policy)?;
        self.apply(path);
        self.selection = Selection::Edge(edge.clone());
        self.impact = None;
        Some(&self.path)
    }

    /// Select an entity, dropping any highlight. Returns false for unknown ids.
    pub fn select_entity(&mut self, entity: &EntityId) -> bool {
        if !self.graph.contains_entity(entity) {
            return false;
        }
        self.clear();
        self.select(entity);
        true
    }

    /// Highlight the upstream and downstream reach of an entity and select it.
    pub fn show_impact(&mut self, entity: &EntityId) -> Option<&ImpactAnalysis> {
        if !self.graph.contains_entity(entity) {
            return None;
        }
        let analysis = analyze_impact(&self.graph, entity);
        self.apply(analysis.to_path());
        self.selection = Selection::Entity(entity.clone());
        self.impact = Some(analysis);
        self.impact.as_ref()
    }

    /// Show or hide one entity's attribute list
    pub fn toggle_expanded(&mut self, entity: &EntityId) {
        self.view = self.view.with_toggled_expansion(entity);
    }

    /// Flip the PII-only filter; returns the new state
    pub fn toggle_pii_only(&mut self) -> bool {
        self.pii_only = !self.pii_only;
        self.pii_only
    }

    /// Entities passing the PII-only filter, in graph order
    pub fn visible_entities(&self) -> Vec<&Entity> {
        self.graph
            .entities()
            .iter()
            .filter(|e| !self.pii_only || e.contains_pii())
            .collect()
    }

    /// Drop all highlighting and the selection.
    pub fn clear(&mut self) {
        self.view = self.view.cleared(&self.graph);
        self.path = ConnectedPath::default();
        self.selection = Selection::None;
        self.impact = None;
    }

    /// Details for the current selection.
    pub fn details(&self) -> Option<Details<'_>> {
        match &self.selection {
            Selection::None => None,
            Selection::Entity(id) => Some(Details::Entity {
                entity: self.graph.entity(id)?,
                impact: self.impact.as_ref()?,
            }),
            Selection::Edge(id) => {
                let edge = self.graph.edge(id)?;
                Some(Details::Edge {
                    edge,
                    source: self.graph.entity(&edge.source)?,
                    target: self.graph.entity(&edge.target)?,
                })
            }
        }
    }

    fn apply(&mut self, path: ConnectedPath) {
        self.view = self.view.project(&self.graph, &path);
        self.path = path;
    }

    fn select(&mut self, entity: &EntityId) {
        self.selection = Selection::Entity(entity.clone());
        self.impact = Some(analyze_impact(&self.graph, entity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fixture::sample_graph;

    fn session() -> LineageSession {
        LineageSession::new(sample_graph().unwrap(), VisitPolicy::default())
    }

    #[test]
    fn test_click_attribute_highlights_and_selects() {
        let mut session = session();
        let path = session.click_attribute(&"3".into(), &"3-2".into()).clone();

        assert!(path.contains_entity(&"1".into()));
        assert!(session.view().entity(&"1".into()).unwrap().is_highlighted);
        assert!(!session.view().entity(&"2".into()).unwrap().is_highlighted);
        assert_eq!(session.selection(), &Selection::Entity("3".into()));
        assert_eq!(session.impact().unwrap().upstream.len(), 2);

        match session.details().unwrap() {
            Details::Entity { entity, impact } => {
                assert_eq!(entity.label, "patient_address");
                assert_eq!(impact.downstream.len(), 0);
            }
            Details::Edge { .. } => panic!("Expected entity details"),
        }
    }

    #[test]
    fn test_new_click_replaces_previous_highlight() {
        let mut session = session();
        session.click_attribute(&"1".into(), &"1-1".into());
        session.click_attribute(&"2".into(), &"2-1".into());

        let view = session.view();
        assert!(!view.entity(&"1".into()).unwrap().is_highlighted);
        assert!(view.entity(&"2".into()).unwrap().is_highlighted);
        assert!(!view.edge(&"e1-3".into()).unwrap().is_highlighted);
        assert!(view.edge(&"e2-3".into()).unwrap().is_highlighted);
    }

    #[test]
    fn test_click_edge() {
        let mut session = session();
        assert!(session.click_edge(&"missing".into()).is_none());
        assert_eq!(session.selection(), &Selection::None);

        let path = session.click_edge(&"e1-3".into()).unwrap();
        assert!(path.contains_attribute(&"1-1".into()));
        assert!(path.contains_attribute(&"3-2".into()));
        assert!(session.impact().is_none());

        match session.details().unwrap() {
            Details::Edge { source, target, .. } => {
                assert_eq!(source.label, "patient");
                assert_eq!(target.label, "patient_address");
            }
            Details::Entity { .. } => panic!("Expected edge details"),
        }
    }

    #[test]
    fn test_select_entity_clears_highlight() {
        let mut session = session();
        session.click_attribute(&"1".into(), &"1-1".into());
        assert!(session.select_entity(&"2".into()));
        assert!(!session.view().has_highlight());
        assert_eq!(session.selection(), &Selection::Entity("2".into()));
        assert_eq!(session.impact().unwrap().downstream, vec![EntityId::new("3")]);

        assert!(!session.select_entity(&"ghost".into()));
    }

    #[test]
    fn test_show_impact_highlights_reach() {
        let mut session = session();
        let analysis = session.show_impact(&"1".into()).unwrap();
        assert_eq!(analysis.impact().downstream_count, 1);
        assert!(session.view().entity(&"3".into()).unwrap().is_highlighted);
        assert!(!session.view().entity(&"2".into()).unwrap().is_highlighted);
        assert!(session.show_impact(&"ghost".into()).is_none());
    }

    #[test]
    fn test_clear_twice_is_stable() {
        let mut session = session();
        session.toggle_expanded(&"1".into());
        session.click_attribute(&"1".into(), &"1-1".into());
        session.clear();
        let once = session.view().clone();
        session.clear();
        assert_eq!(session.view(), &once);
        assert!(once.entity(&"1".into()).unwrap().is_expanded);
        assert!(session.details().is_none());
    }

    #[test]
    fn test_pii_filter() {
        let mut session = session();
        assert_eq!(session.visible_entities().len(), 3);
        assert!(session.toggle_pii_only());
        let labels: Vec<&str> = session
            .visible_entities()
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, vec!["patient", "patient_address"]);
        assert!(!session.toggle_pii_only());
    }

    #[test]
    fn test_trace_without_attribute_follows_all_edges() {
        let mut session = session();
        let path = session.trace(&"3".into(), None).clone();
        assert_eq!(path.entities.len(), 3);
        assert!(path.contains_edge(&"e1-3".into()));
        assert!(path.contains_edge(&"e2-3".into()));
        assert_eq!(session.selection(), &Selection::Entity("3".into()));
    }

    #[test]
    fn test_unknown_attribute_click_keeps_selection() {
        let mut session = session();
        session.select_entity(&"2".into());
        let path = session.click_attribute(&"ghost".into(), &"boo".into()).clone();
        assert_eq!(path.entities.len(), 1);
        assert_eq!(session.selection(), &Selection::Entity("2".into()));
    }
}
