//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use super::args::{CheckArgs, InfoArgs, InitArgs, RootsArgs, SearchArgs, ShowArgs, ViewArgs};
use crate::app::App;
use crate::domain::PersonId;
use crate::error::Error;
use crate::output::{self, DataSummary, OutputMode, PersonDetails};
use crate::resolve::{match_name, RelationshipResolver};
use crate::view::{FamilyView, ViewRequest};

/// Execute the init command
pub async fn execute_init(base_dir: &Path, args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let result = init::init(base_dir, args.data_file.as_deref()).await?;

    if !args.quiet {
        println!("Initialized stemma in {}", base_dir.display());
        println!("  Config: {}", result.config_file.display());
        let note = if result.created_data_file {
            " (created empty)"
        } else {
            ""
        };
        println!("  Data:   {}{note}", result.data_file.display());
    }

    Ok(())
}

/// Execute the view command
pub fn execute_view(app: &App, args: &ViewArgs, output_mode: OutputMode) -> Result<()> {
    let request = view_request(app, args);
    debug!(?request, "Building view");

    let view = FamilyView::build(app.store(), &request, &app.config().generation_options());
    output::print_view(&view, output_mode)?;
    Ok(())
}

/// Turns CLI flags into a request.
///
/// Config defaults for the limits only apply when a root is given, so a bare
/// `stemma view` always shows the complete tree.
fn view_request(app: &App, args: &ViewArgs) -> ViewRequest {
    let root = args.root();
    let defaults = if root.is_some() {
        app.config().view
    } else {
        crate::config::ViewSection::default()
    };
    ViewRequest {
        root,
        generations_back: args.generations_back.unwrap_or(defaults.generations_back),
        generations_forward: args
            .generations_forward
            .unwrap_or(defaults.generations_forward),
    }
}

/// Execute the search command
pub fn execute_search(app: &App, args: &SearchArgs, output_mode: OutputMode) -> Result<()> {
    let matches = match_name(app.store(), &args.query);
    output::print_matches(app.store(), &args.query, &matches, output_mode)?;
    Ok(())
}

/// Execute the show command
pub fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let store = app.store();
    let id = PersonId::new(args.person_id.as_str());
    let record = store
        .get(&id)
        .ok_or_else(|| Error::PersonNotFound(id.clone()))?;

    let details = PersonDetails {
        record,
        parents: store.resolved_parents(record).collect(),
        spouse: store.spouse_of(&id),
        children: store.children_of(&id).iter().collect(),
    };
    output::print_person(store, &details, output_mode)?;
    Ok(())
}

/// Execute the roots command
pub fn execute_roots(app: &App, _args: &RootsArgs, output_mode: OutputMode) -> Result<()> {
    let roots = RelationshipResolver::new(app.store()).root_ancestors();
    output::print_roots(app.store(), &roots, output_mode)?;
    Ok(())
}

/// Execute the check command
///
/// Warnings are findings, not failures: the exit status stays 0.
pub fn execute_check(app: &App, _args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    output::print_load_warnings(app.warnings(), output_mode)?;
    Ok(())
}

/// Execute the info command
pub fn execute_info(app: &App, _args: &InfoArgs, output_mode: OutputMode) -> Result<()> {
    let summary = DataSummary {
        config_file: app.config_path(),
        data_file: app.data_path(),
        people: app.store().len(),
        warnings: app.warnings().len(),
    };
    output::print_summary(&summary, output_mode)?;
    Ok(())
}
