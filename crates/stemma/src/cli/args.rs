//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use super::validators::{validate_name_query, validate_person_id};
use crate::domain::PersonId;
use crate::resolve::RootQuery;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Data file to record in the new config (default: family.jsonl)
    ///
    /// Relative paths are resolved against the directory holding
    /// `stemma.yaml`. An empty file is created if none exists.
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `view` command
#[derive(Parser, Debug, Clone)]
pub struct ViewArgs {
    /// Root person by ID
    #[arg(long, value_parser = validate_person_id, conflicts_with = "name")]
    pub id: Option<String>,

    /// Root person by name (case-insensitive; exact matches win over partial)
    #[arg(long, value_parser = validate_name_query)]
    pub name: Option<String>,

    /// Ancestor generations to include above the root
    ///
    /// Defaults to `view.generations-back` from the config when a root is
    /// given, otherwise 0.
    #[arg(short = 'b', long = "back")]
    pub generations_back: Option<u32>,

    /// Descendant generations to include below the root
    ///
    /// Defaults to `view.generations-forward` from the config when a root is
    /// given, otherwise 0.
    #[arg(short = 'f', long = "forward")]
    pub generations_forward: Option<u32>,
}

impl ViewArgs {
    /// The root query, if one was given.
    #[must_use]
    pub fn root(&self) -> Option<RootQuery> {
        match (&self.id, &self.name) {
            (Some(id), _) => Some(RootQuery::Id(PersonId::new(id.as_str()))),
            (None, Some(name)) => Some(RootQuery::Name(name.clone())),
            (None, None) => None,
        }
    }
}

/// Arguments for the `search` command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Name or part of a name (case-insensitive)
    #[arg(value_parser = validate_name_query)]
    pub query: String,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Person ID to display
    #[arg(value_parser = validate_person_id)]
    pub person_id: String,
}

/// Arguments for the `roots` command
#[derive(Parser, Debug, Clone)]
pub struct RootsArgs {}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {}

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {}
