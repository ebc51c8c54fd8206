//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub mod color;

use crate::domain::{Attribute, Edge, Entity};
use crate::graph::{ConnectedPath, ImpactAnalysis, LineageGraph};
use crate::highlight::{EdgeStyle, LineageView};
use crate::search::{SearchHitKind, SearchResult};
use crate::source::LoadWarning;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{
    arrow, bold, colorize_impact, colorize_kind, colorize_relationship, dimmed, highlight_marker,
    pii_badge,
};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `LINEAGE_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `LINEAGE_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `LINEAGE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let max_width = match env::var("LINEAGE_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "LINEAGE_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match env::var("LINEAGE_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "LINEAGE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR (https://no-color.org/), LINEAGE_COLOR for explicit control
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("LINEAGE_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

fn content_width(config: &OutputConfig) -> usize {
    get_terminal_width().min(config.max_width)
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width)
                    .into_iter()
                    .map(|s| s.into_owned())
                    .collect()
            }
        })
        .collect()
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

fn dispatch<F>(mode: OutputMode, json: &impl Serialize, text: F) -> io::Result<()>
where
    F: FnOnce(&mut io::StdoutLock<'static>, &OutputConfig) -> io::Result<()>,
{
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => text(&mut handle, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, json),
    }
}

/// Print a list of entities
pub fn print_entities(entities: &[&Entity], mode: OutputMode) -> io::Result<()> {
    dispatch(mode, &entities, |w, config| {
        print_entities_text(w, entities, config)
    })
}

/// Print one entity with its attributes and impact (for the show command)
pub fn print_entity_details(
    entity: &Entity,
    impact: &ImpactAnalysis,
    mode: OutputMode,
) -> io::Result<()> {
    let json = serde_json::json!({
        "entity": entity,
        "impact": impact_json(impact),
    });
    dispatch(mode, &json, |w, config| {
        print_entity_details_text(w, entity, impact, config)
    })
}

/// Print a highlighted path over the whole graph
pub fn print_path(
    graph: &LineageGraph,
    path: &ConnectedPath,
    view: &LineageView,
    mode: OutputMode,
) -> io::Result<()> {
    let json = serde_json::json!({ "path": path, "view": view });
    dispatch(mode, &json, |w, config| {
        print_path_text(w, graph, path, view, config)
    })
}

/// Print an edge and the path traced through it
pub fn print_edge_path(
    graph: &LineageGraph,
    edge: &Edge,
    path: Option<&ConnectedPath>,
    view: &LineageView,
    mode: OutputMode,
) -> io::Result<()> {
    let json = serde_json::json!({ "edge": edge, "path": path, "view": view });
    dispatch(mode, &json, |w, config| {
        print_edge_header_text(w, graph, edge, config)?;
        match path {
            Some(path) => print_path_text(w, graph, path, view, config),
            None => writeln!(
                w,
                "{}",
                dimmed("Entity-level edge: no attribute path to trace.", config)
            ),
        }
    })
}

/// Print an impact analysis
pub fn print_impact(
    graph: &LineageGraph,
    analysis: &ImpactAnalysis,
    mode: OutputMode,
) -> io::Result<()> {
    dispatch(mode, &impact_json(analysis), |w, config| {
        print_impact_text(w, graph, analysis, config)
    })
}

/// Print search results
pub fn print_search_results(results: &[SearchResult], mode: OutputMode) -> io::Result<()> {
    dispatch(mode, &results, |w, config| {
        print_search_text(w, results, config)
    })
}

/// Print the outcome of loading a graph
pub fn print_validation(
    source: &str,
    graph: &LineageGraph,
    warnings: &[LoadWarning],
    mode: OutputMode,
) -> io::Result<()> {
    let json = serde_json::json!({
        "source": source,
        "entities": graph.entity_count(),
        "edges": graph.edge_count(),
        "warnings": warnings,
    });
    dispatch(mode, &json, |w, config| {
        print_validation_text(w, source, graph, warnings, config)
    })
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    write_json(&mut io::stdout().lock(), value)
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

fn impact_json(analysis: &ImpactAnalysis) -> serde_json::Value {
    let counts = analysis.impact();
    serde_json::json!({
        "root_entity": analysis.root_entity,
        "upstream_count": counts.upstream_count,
        "downstream_count": counts.downstream_count,
        "upstream": analysis.upstream,
        "downstream": analysis.downstream,
        "affected_entities": analysis.affected_entities(),
        "edges": analysis.edges,
        "estimated_impact": analysis.estimated_impact,
    })
}

// ============================================================================
// Text Formatting
// ============================================================================

fn entity_line(entity: &Entity, config: &OutputConfig) -> String {
    let mut line = format!(
        "{} {} [{}]",
        info(entity.id.as_str(), config),
        entity.label,
        colorize_kind(entity.kind, config)
    );
    let badge = pii_badge(entity.contains_pii(), config);
    if !badge.is_empty() {
        line.push(' ');
        line.push_str(&badge);
    }
    line
}

fn attribute_line(attribute: &Attribute, config: &OutputConfig) -> String {
    let mut line = format!(
        "{} {} {}",
        info(attribute.id.as_str(), config),
        attribute.name,
        dimmed(&attribute.data_type, config)
    );
    if attribute.is_primary_key {
        line.push_str(" PK");
    }
    if attribute.is_foreign_key {
        line.push_str(" FK");
    }
    if attribute.has_pii {
        line.push(' ');
        line.push_str(&pii_badge(true, config));
    }
    line
}

fn style_summary(style: &EdgeStyle) -> String {
    let mut parts = vec![format!("width {}", style.width)];
    if style.dashed {
        parts.push("dashed".to_string());
    }
    if style.animated {
        parts.push("animated".to_string());
    }
    parts.join(", ")
}

fn print_entities_text<W: Write>(
    w: &mut W,
    entities: &[&Entity],
    config: &OutputConfig,
) -> io::Result<()> {
    if entities.is_empty() {
        writeln!(w, "No entities found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} entit{}:", entities.len(), if entities.len() == 1 { "y" } else { "ies" })?;
    writeln!(w)?;
    for entity in entities {
        writeln!(
            w,
            "{} {}",
            entity_line(entity, config),
            dimmed(&format!("({} attributes)", entity.attributes.len()), config)
        )?;
    }
    Ok(())
}

fn print_entity_details_text<W: Write>(
    w: &mut W,
    entity: &Entity,
    impact: &ImpactAnalysis,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", entity_line(entity, config))?;

    if let Some(metadata) = &entity.metadata {
        let fields = [
            ("Owner", metadata.owner.clone()),
            ("Rows", metadata.row_count.map(|n| n.to_string())),
            ("Domain", metadata.domain.clone()),
            ("Quality", metadata.quality_score.map(|q| format!("{q}"))),
            ("Modified", metadata.last_modified.map(|t| t.to_rfc3339())),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                writeln!(w, "  {} {}", dimmed(&format!("{label}:"), config), value)?;
            }
        }
        if let Some(doc) = &metadata.documentation {
            writeln!(w)?;
            writeln!(w, "{}:", bold("Documentation", config))?;
            for line in wrap_text(doc, content_width(config).saturating_sub(2)) {
                writeln!(w, "  {line}")?;
            }
        }
    }

    writeln!(w)?;
    writeln!(
        w,
        "{}",
        bold(&format!("Attributes ({}):", entity.attributes.len()), config)
    )?;
    for attribute in &entity.attributes {
        writeln!(w, "  {}", attribute_line(attribute, config))?;
    }

    let counts = impact.impact();
    writeln!(w)?;
    writeln!(
        w,
        "{} upstream {}, downstream {} ({})",
        bold("Impact:", config),
        counts.upstream_count,
        counts.downstream_count,
        colorize_impact(impact.estimated_impact, config)
    )?;
    Ok(())
}

fn print_path_text<W: Write>(
    w: &mut W,
    graph: &LineageGraph,
    path: &ConnectedPath,
    view: &LineageView,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "Connected path: {} entities, {} edges, {} attributes",
        path.entities.len(),
        path.edges.len(),
        path.attributes.len()
    )?;

    writeln!(w)?;
    writeln!(w, "{}", bold("Entities:", config))?;
    for entity in graph.entities() {
        let Some(entity_view) = view.entity(&entity.id) else {
            continue;
        };
        writeln!(
            w,
            "  {} {}",
            highlight_marker(entity_view.is_highlighted, config),
            entity_line(entity, config)
        )?;
        for (attribute, attribute_view) in entity.attributes.iter().zip(&entity_view.attributes) {
            if attribute_view.is_highlighted || entity_view.is_expanded {
                writeln!(
                    w,
                    "      {} {}",
                    highlight_marker(attribute_view.is_highlighted, config),
                    attribute_line(attribute, config)
                )?;
            }
        }
    }

    if graph.edge_count() > 0 {
        writeln!(w)?;
        writeln!(w, "{}", bold("Edges:", config))?;
    }
    for edge in graph.edges() {
        let Some(edge_view) = view.edge(&edge.id) else {
            continue;
        };
        writeln!(
            w,
            "  {} {} {} {} {} {} {}",
            highlight_marker(edge_view.is_highlighted, config),
            info(edge.id.as_str(), config),
            label_of(graph, &edge.source),
            arrow(config),
            label_of(graph, &edge.target),
            colorize_relationship(edge.relationship_type, config),
            dimmed(&format!("[{}]", style_summary(&edge_view.style)), config)
        )?;
    }
    Ok(())
}

fn print_edge_header_text<W: Write>(
    w: &mut W,
    graph: &LineageGraph,
    edge: &Edge,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {} {} {} {}",
        info(edge.id.as_str(), config),
        label_of(graph, &edge.source),
        arrow(config),
        label_of(graph, &edge.target),
        colorize_relationship(edge.relationship_type, config)
    )?;
    if let (Some(from), Some(to)) = (&edge.source_attribute, &edge.target_attribute) {
        writeln!(w, "  {} {from} {} {to}", dimmed("Columns:", config), arrow(config))?;
    }
    if let Some(confidence) = edge.confidence {
        writeln!(w, "  {} {confidence}%", dimmed("Confidence:", config))?;
    }
    if let Some(logic) = &edge.transformation_logic {
        writeln!(w, "  {} {logic}", dimmed("Transformation:", config))?;
    }
    writeln!(w)
}

fn print_impact_text<W: Write>(
    w: &mut W,
    graph: &LineageGraph,
    analysis: &ImpactAnalysis,
    config: &OutputConfig,
) -> io::Result<()> {
    let counts = analysis.impact();
    writeln!(
        w,
        "Impact analysis for {} ({}):",
        bold(&label_of(graph, &analysis.root_entity), config),
        colorize_impact(analysis.estimated_impact, config)
    )?;

    let sides = [
        ("Upstream", counts.upstream_count, &analysis.upstream),
        ("Downstream", counts.downstream_count, &analysis.downstream),
    ];
    for (title, count, ids) in sides {
        writeln!(w)?;
        writeln!(w, "  {} ({count}):", bold(title, config))?;
        if ids.is_empty() {
            writeln!(w, "    {}", dimmed("(none)", config))?;
        }
        for id in ids {
            writeln!(w, "    {} {}", info(id.as_str(), config), label_of(graph, id))?;
        }
    }
    Ok(())
}

fn print_search_text<W: Write>(
    w: &mut W,
    results: &[SearchResult],
    config: &OutputConfig,
) -> io::Result<()> {
    if results.is_empty() {
        writeln!(w, "No matches.")?;
        return Ok(());
    }

    for result in results {
        let kind = match result.kind {
            SearchHitKind::Entity => "entity",
            SearchHitKind::Attribute => "attribute",
        };
        let mut line = format!(
            "{:.2} {} {} {}",
            result.match_score,
            dimmed(kind, config),
            result.path,
            info(&format!("({})", result.id), config)
        );
        if result.has_pii {
            line.push(' ');
            line.push_str(&pii_badge(true, config));
        }
        writeln!(w, "{line}")?;
    }
    Ok(())
}

fn print_validation_text<W: Write>(
    w: &mut W,
    source: &str,
    graph: &LineageGraph,
    warnings: &[LoadWarning],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "Loaded {} entities and {} edges from {source}",
        graph.entity_count(),
        graph.edge_count()
    )?;
    if warnings.is_empty() {
        writeln!(w, "{}", success("No problems found.", config))?;
        return Ok(());
    }
    writeln!(w, "{}", warning(&format!("{} warning(s):", warnings.len()), config))?;
    for item in warnings {
        writeln!(w, "  {item}")?;
    }
    Ok(())
}

/// Entity label, or the raw id if the entity is unknown.
fn label_of(graph: &LineageGraph, id: &crate::domain::EntityId) -> String {
    graph
        .entity(id)
        .map_or_else(|| id.to_string(), |e| e.label.clone())
}
