//! Case-insensitive search over entity labels and attribute names.

use crate::domain::{Entity, EntityId};
use crate::graph::LineageGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score of an exact (case-insensitive) match.
pub const EXACT_MATCH_SCORE: f64 = 1.0;

/// Score of a prefix match.
pub const PREFIX_MATCH_SCORE: f64 = 0.8;

/// Score of a match anywhere else in the name.
pub const SUBSTRING_MATCH_SCORE: f64 = 0.5;

/// What a search hit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchHitKind {
    /// An entity label matched
    Entity,
    /// An attribute name matched
    Attribute,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Id of the matched entity or attribute
    pub id: String,

    /// Matched label or name
    pub name: String,

    /// Entity or attribute hit
    pub kind: SearchHitKind,

    /// Owning entity (the entity itself for entity hits)
    pub entity_id: EntityId,

    /// Owning entity label
    pub entity_name: String,

    /// `entity` or `entity.attribute`
    pub path: String,

    /// Match quality in `0.0..=1.0`
    pub match_score: f64,

    /// Personal data involved
    pub has_pii: bool,
}

/// Search entities and attributes by name.
///
/// A blank term lists every entity (attributes are not listed then). Results
/// are ordered by score, best first, then by path. `limit` caps the number
/// of results.
pub fn search(graph: &LineageGraph, term: &str, limit: Option<usize>) -> Vec<SearchResult> {
    let needle = term.trim().to_lowercase();
    let mut results = Vec::new();

    for entity in graph.entities() {
        if needle.is_empty() {
            results.push(entity_hit(entity, SUBSTRING_MATCH_SCORE));
            continue;
        }
        if let Some(score) = match_score_for(&entity.label, &needle) {
            results.push(entity_hit(entity, score));
        }
        for attribute in &entity.attributes {
            if let Some(score) = match_score_for(&attribute.name, &needle) {
                results.push(SearchResult {
                    id: attribute.id.to_string(),
                    name: attribute.name.clone(),
                    kind: SearchHitKind::Attribute,
                    entity_id: entity.id.clone(),
                    entity_name: entity.label.clone(),
                    path: format!("{}.{}", entity.label, attribute.name),
                    match_score: score,
                    has_pii: attribute.has_pii,
                });
            }
        }
    }

    results.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    if let Some(limit) = limit {
        results.truncate(limit);
    }

    tracing::debug!(term, hits = results.len(), "Search complete");
    results
}

fn entity_hit(entity: &Entity, match_score: f64) -> SearchResult {
    SearchResult {
        id: entity.id.to_string(),
        name: entity.label.clone(),
        kind: SearchHitKind::Entity,
        entity_id: entity.id.clone(),
        entity_name: entity.label.clone(),
        path: entity.label.clone(),
        match_score,
        has_pii: entity.contains_pii(),
    }
}

fn match_score_for(name: &str, needle: &str) -> Option<f64> {
    let name = name.to_lowercase();
    if name == needle {
        Some(EXACT_MATCH_SCORE)
    } else if name.starts_with(needle) {
        Some(PREFIX_MATCH_SCORE)
    } else if name.contains(needle) {
        Some(SUBSTRING_MATCH_SCORE)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fixture::sample_graph;

    #[test]
    fn test_search_ranks_exact_then_prefix_then_substring() {
        let graph = sample_graph().unwrap();
        let results = search(&graph, "patient", None);

        let paths: Vec<&str> = results.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths[0], "patient");
        assert_eq!(results[0].kind, SearchHitKind::Entity);
        assert_eq!(results[0].match_score, EXACT_MATCH_SCORE);
        assert!(paths.contains(&"patient_address"));
        assert!(paths.contains(&"patient.patient_id"));
        assert!(paths.contains(&"patient_address.patient_id"));
        assert!(results.windows(2).all(|w| w[0].match_score >= w[1].match_score));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let graph = sample_graph().unwrap();
        let results = search(&graph, "  SSN ", None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "patient.ssn");
        assert!(results[0].has_pii);
        assert_eq!(results[0].entity_id, EntityId::new("1"));
    }

    #[test]
    fn test_blank_term_lists_entities() {
        let graph = sample_graph().unwrap();
        let results = search(&graph, "", None);
        assert_eq!(results.len(), graph.entity_count());
        assert!(results.iter().all(|r| r.kind == SearchHitKind::Entity));
    }

    #[test]
    fn test_limit_and_no_match() {
        let graph = sample_graph().unwrap();
        assert_eq!(search(&graph, "id", Some(2)).len(), 2);
        assert!(search(&graph, "nothing-like-this", None).is_empty());
    }
}
