//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Lookups that
//! the library treats as fail-soft (unknown seeds, unknown edges) are turned
//! into errors here so the process exits non-zero.

use anyhow::{bail, Result};

use super::args::{
    EdgeArgs, EntitiesArgs, ImpactArgs, PathArgs, SearchArgs, ShowArgs, ValidateArgs,
};
use crate::app::App;
use crate::domain::{AttributeId, EdgeId, EntityId};
use crate::error::Error;
use crate::output::{self, OutputMode};
use crate::session::Details;

/// Execute the entities command
pub fn execute_entities(app: &mut App, args: &EntitiesArgs, output_mode: OutputMode) -> Result<()> {
    let session = app.session_mut();
    if args.pii_only {
        session.toggle_pii_only();
    }
    output::print_entities(&session.visible_entities(), output_mode)?;
    Ok(())
}

/// Execute the show command
pub fn execute_show(app: &mut App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let id = EntityId::new(args.entity.as_str());
    let session = app.session_mut();
    if !session.select_entity(&id) {
        return Err(Error::EntityNotFound(id).into());
    }

    match session.details() {
        Some(Details::Entity { entity, impact }) => {
            output::print_entity_details(entity, impact, output_mode)?;
        }
        _ => bail!("No details available for entity {id}"),
    }
    Ok(())
}

/// Execute the path command
pub fn execute_path(app: &mut App, args: &PathArgs, output_mode: OutputMode) -> Result<()> {
    let id = EntityId::new(args.entity.as_str());
    let attribute = args.attribute.as_deref().map(AttributeId::new);

    let session = app.session_mut();
    let Some(entity) = session.graph().entity(&id) else {
        return Err(Error::EntityNotFound(id).into());
    };
    if let Some(attribute) = &attribute {
        if entity.attribute(attribute).is_none() {
            return Err(Error::AttributeNotFound {
                entity: id,
                attribute: attribute.clone(),
            }
            .into());
        }
    }

    session.trace(&id, attribute.as_ref());
    output::print_path(session.graph(), session.path(), session.view(), output_mode)?;
    Ok(())
}

/// Execute the edge command
pub fn execute_edge(app: &mut App, args: &EdgeArgs, output_mode: OutputMode) -> Result<()> {
    let id = EdgeId::new(args.edge.as_str());
    let session = app.session_mut();
    if session.graph().edge(&id).is_none() {
        return Err(Error::EdgeNotFound(id).into());
    }

    let traced = session.click_edge(&id).is_some();
    let Some(edge) = session.graph().edge(&id) else {
        return Err(Error::EdgeNotFound(id).into());
    };
    let path = traced.then(|| session.path());
    output::print_edge_path(session.graph(), edge, path, session.view(), output_mode)?;
    Ok(())
}

/// Execute the impact command
pub fn execute_impact(app: &mut App, args: &ImpactArgs, output_mode: OutputMode) -> Result<()> {
    let id = EntityId::new(args.entity.as_str());
    let session = app.session_mut();
    if session.show_impact(&id).is_none() {
        return Err(Error::EntityNotFound(id).into());
    }

    let Some(analysis) = session.impact() else {
        bail!("Impact analysis for {id} was not recorded");
    };
    output::print_impact(session.graph(), analysis, output_mode)?;
    Ok(())
}

/// Execute the search command
pub fn execute_search(app: &App, args: &SearchArgs, output_mode: OutputMode) -> Result<()> {
    let results = crate::search::search(
        app.session().graph(),
        args.term.as_deref().unwrap_or_default(),
        args.limit,
    );
    output::print_search_results(&results, output_mode)?;
    Ok(())
}

/// Execute the validate command
pub fn execute_validate(app: &App, args: &ValidateArgs, output_mode: OutputMode) -> Result<()> {
    output::print_validation(app.source(), app.session().graph(), app.warnings(), output_mode)?;

    if args.strict && !app.warnings().is_empty() {
        bail!(
            "{} record(s) dropped while loading {}",
            app.warnings().len(),
            app.source()
        );
    }
    Ok(())
}
