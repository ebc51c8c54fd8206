//! Built-in sample graph: a patient table, an address-type lookup, and the
//! patient address table referencing both.

use crate::domain::{Attribute, Edge, Entity, EntityKind, EntityMetadata};
use crate::error::GraphError;
use crate::graph::LineageGraph;

fn metadata(owner: &str, row_count: u64, quality_score: f64, domain: &str) -> EntityMetadata {
    EntityMetadata {
        owner: Some(owner.to_string()),
        row_count: Some(row_count),
        quality_score: Some(quality_score),
        domain: Some(domain.to_string()),
        ..EntityMetadata::default()
    }
}

/// Entities of the sample graph.
pub fn sample_entities() -> Vec<Entity> {
    vec![
        Entity::new("1", "patient", EntityKind::Source)
            .with_attribute(Attribute::new("1-1", "patient_id", "int").primary_key())
            .with_attribute(Attribute::new("1-2", "first_name", "varchar").pii())
            .with_attribute(Attribute::new("1-3", "last_name", "varchar").pii())
            .with_attribute(Attribute::new("1-4", "date_of_birth", "date").pii())
            .with_attribute(Attribute::new("1-5", "ssn", "varchar").pii())
            .with_metadata(metadata("Healthcare Team", 15_000, 95.0, "Healthcare")),
        Entity::new("2", "lookup_address_type", EntityKind::Source)
            .with_attribute(Attribute::new("2-1", "address_type_id", "int").primary_key())
            .with_attribute(Attribute::new("2-2", "type_name", "varchar"))
            .with_attribute(Attribute::new("2-3", "description", "varchar"))
            .with_metadata(metadata("System", 5, 100.0, "Reference")),
        Entity {
            has_pii: true,
            ..Entity::new("3", "patient_address", EntityKind::Entity)
                .with_attribute(Attribute::new("3-1", "address_id", "int").primary_key())
                .with_attribute(Attribute::new("3-2", "patient_id", "int").foreign_key())
                .with_attribute(Attribute::new("3-3", "address_type_id", "int").foreign_key())
                .with_attribute(Attribute::new("3-4", "street_address", "varchar").pii())
                .with_attribute(Attribute::new("3-5", "city", "varchar").pii())
                .with_attribute(Attribute::new("3-6", "state", "varchar").pii())
                .with_attribute(Attribute::new("3-7", "zip_code", "varchar").pii())
                .with_metadata(metadata("Healthcare Team", 25_000, 90.0, "Healthcare"))
        },
    ]
}

/// Edges of the sample graph.
pub fn sample_edges() -> Vec<Edge> {
    vec![
        Edge::new("e1-3", "1", "3")
            .with_attributes("1-1", "3-2")
            .with_confidence(100.0),
        Edge::new("e2-3", "2", "3")
            .with_attributes("2-1", "3-3")
            .with_confidence(100.0),
    ]
}

/// The sample graph.
///
/// # Errors
///
/// Only if the sample data itself is inconsistent.
pub fn sample_graph() -> Result<LineageGraph, GraphError> {
    LineageGraph::new(sample_entities(), sample_edges())
}
