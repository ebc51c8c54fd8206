//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Highlight:     green   (entities, attributes and edges on the path)
//!   - Warning:       yellow  (load warnings, medium impact)
//!   - Error/PII:     red     (PII badges, critical impact)
//!   - Info/Reference: cyan   (entity, attribute and edge ids)
//!   - Accent:        magenta (derived entities and edges)
//!   - Muted:         dimmed  (field labels, off-path items)
//!   - Emphasis:      bold    (section headers)

use crate::domain::{EntityKind, RelationshipType};
use crate::graph::ImpactLevel;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Colorize an entity kind.
pub(crate) fn colorize_kind(kind: EntityKind, config: &OutputConfig) -> String {
    let text = kind.to_string();
    if !config.use_colors {
        return text;
    }
    match kind {
        EntityKind::Source => text.blue().to_string(),
        EntityKind::Entity => text.white().to_string(),
        EntityKind::Derived => text.magenta().to_string(),
        EntityKind::Destination => text.green().to_string(),
    }
}

/// Colorize a relationship type.
pub(crate) fn colorize_relationship(relationship: RelationshipType, config: &OutputConfig) -> String {
    let text = relationship.to_string();
    if !config.use_colors {
        return text;
    }
    match relationship {
        RelationshipType::Fk => text.cyan().to_string(),
        RelationshipType::Derived => text.magenta().to_string(),
        RelationshipType::Copy => text.blue().to_string(),
    }
}

/// Colorize an impact rating.
pub(crate) fn colorize_impact(level: ImpactLevel, config: &OutputConfig) -> String {
    let text = level.to_string();
    if !config.use_colors {
        return text;
    }
    match level {
        ImpactLevel::Low => text.green().to_string(),
        ImpactLevel::Medium => text.yellow().to_string(),
        ImpactLevel::High => text.red().to_string(),
        ImpactLevel::Critical => text.red().bold().to_string(),
    }
}

/// A `PII` badge, or an empty string.
pub(crate) fn pii_badge(has_pii: bool, config: &OutputConfig) -> String {
    if !has_pii {
        return String::new();
    }
    error("[PII]", config)
}

/// Marker placed before an item, with ASCII fallback support.
pub(crate) fn highlight_marker(is_highlighted: bool, config: &OutputConfig) -> String {
    let icon = match (is_highlighted, config.use_ascii) {
        (true, true) => "*",
        (true, false) => "●",
        (false, true) => "-",
        (false, false) => "○",
    };
    if is_highlighted {
        success(icon, config)
    } else {
        dimmed(icon, config)
    }
}

/// Arrow between edge endpoints, with ASCII fallback support.
pub(crate) fn arrow(config: &OutputConfig) -> &'static str {
    if config.use_ascii { "->" } else { "→" }
}
