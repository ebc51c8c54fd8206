//! Domain types for lineage graphs.
//!
//! Entities are table-like nodes, attributes are their columns, and edges are
//! directed relationships from an upstream entity to a downstream one,
//! optionally scoped to a pair of attributes.
//!
//! Presentation state (highlighting, expansion, edge styles) deliberately does
//! not live here; see [`crate::highlight`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identifier for an entity
    EntityId
);

string_id!(
    /// Identifier for an attribute, unique across the whole graph
    AttributeId
);

string_id!(
    /// Unique identifier for an edge
    EdgeId
);

/// Role of an entity in the data pipeline. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Where data originates
    Source,

    /// Plain stored entity
    Entity,

    /// Computed from other entities
    Derived,

    /// Final consumer of the data
    Destination,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Source => "source",
            EntityKind::Entity => "entity",
            EntityKind::Derived => "derived",
            EntityKind::Destination => "destination",
        };
        write!(f, "{s}")
    }
}

/// Kind of relationship an edge represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    /// Foreign key reference
    #[default]
    #[serde(rename = "FK")]
    Fk,

    /// Derived through a transformation
    #[serde(rename = "DERIVED")]
    Derived,

    /// Straight copy
    #[serde(rename = "COPY")]
    Copy,
}

impl RelationshipType {
    /// Parse the wire name (`FK`, `DERIVED`, `COPY`), ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FK" => Some(Self::Fk),
            "DERIVED" => Some(Self::Derived),
            "COPY" => Some(Self::Copy),
            _ => None,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationshipType::Fk => "FK",
            RelationshipType::Derived => "DERIVED",
            RelationshipType::Copy => "COPY",
        };
        write!(f, "{s}")
    }
}

/// Descriptive metadata attached to an entity. Inert to traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    /// Owning team or person
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Approximate number of rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    /// Free-form documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// Data quality score (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,

    /// Business domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// A column within an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Identifier, unique across the graph
    pub id: AttributeId,

    /// Column name
    pub name: String,

    /// Column data type
    #[serde(rename = "type")]
    pub data_type: String,

    /// Part of the primary key
    #[serde(default)]
    pub is_primary_key: bool,

    /// References another entity
    #[serde(default)]
    pub is_foreign_key: bool,

    /// Holds personal data
    #[serde(default, rename = "hasPII")]
    pub has_pii: bool,

    /// Column description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Example values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_values: Vec<String>,
}

impl Attribute {
    /// Create a plain attribute with no flags set
    pub fn new(id: impl Into<AttributeId>, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
            has_pii: false,
            description: None,
            sample_values: Vec::new(),
        }
    }

    /// Mark as primary key
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Mark as foreign key
    #[must_use]
    pub fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    /// Mark as holding personal data
    #[must_use]
    pub fn pii(mut self) -> Self {
        self.has_pii = true;
        self
    }
}

/// A table-like node in the lineage graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique identifier
    pub id: EntityId,

    /// Human-readable name
    pub label: String,

    /// Pipeline role
    #[serde(rename = "type")]
    pub kind: EntityKind,

    /// Entity-level PII flag
    #[serde(default, rename = "hasPII")]
    pub has_pii: bool,

    /// Columns, in display order
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// Descriptive metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntityMetadata>,
}

impl Entity {
    /// Create an entity without attributes
    pub fn new(id: impl Into<EntityId>, label: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            has_pii: false,
            attributes: Vec::new(),
            metadata: None,
        }
    }

    /// Append an attribute
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Attach metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: EntityMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Look up one of this entity's attributes
    pub fn attribute(&self, id: &AttributeId) -> Option<&Attribute> {
        self.attributes.iter().find(|a| &a.id == id)
    }

    /// Whether the entity carries personal data, directly or through any attribute
    pub fn contains_pii(&self) -> bool {
        self.has_pii || self.attributes.iter().any(|a| a.has_pii)
    }
}

/// A directed relationship from an upstream entity to a downstream one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique identifier
    pub id: EdgeId,

    /// Upstream entity
    pub source: EntityId,

    /// Downstream entity
    pub target: EntityId,

    /// Column on the source side, if the edge is column-scoped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_attribute: Option<AttributeId>,

    /// Column on the target side, if the edge is column-scoped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_attribute: Option<AttributeId>,

    /// Relationship kind
    #[serde(default)]
    pub relationship_type: RelationshipType,

    /// Confidence score (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// How the target is produced from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_logic: Option<String>,
}

impl Edge {
    /// Create an entity-level FK edge
    pub fn new(id: impl Into<EdgeId>, source: impl Into<EntityId>, target: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_attribute: None,
            target_attribute: None,
            relationship_type: RelationshipType::Fk,
            confidence: None,
            transformation_logic: None,
        }
    }

    /// Scope the edge to a source/target attribute pair
    #[must_use]
    pub fn with_attributes(
        mut self,
        source_attribute: impl Into<AttributeId>,
        target_attribute: impl Into<AttributeId>,
    ) -> Self {
        self.source_attribute = Some(source_attribute.into());
        self.target_attribute = Some(target_attribute.into());
        self
    }

    /// Set the relationship type
    #[must_use]
    pub fn with_relationship(mut self, relationship_type: RelationshipType) -> Self {
        self.relationship_type = relationship_type;
        self
    }

    /// Set the confidence score
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// True when both ends name an attribute
    pub fn is_attribute_scoped(&self) -> bool {
        self.source_attribute.is_some() && self.target_attribute.is_some()
    }
}
