//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for stemma using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `init`: Write a default `stemma.yaml`
//! - `view`: Resolve, rank and print a family view
//! - `search`: Find people by name
//! - `show`: Show one person and their relations
//! - `roots`: List complete-tree root ancestors
//! - `check`: Report data quality warnings
//! - `info`: Show config and data file summary
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config <path>`: Use this config file instead of searching for `stemma.yaml`
//! - `--data <path>`: Use this data file instead of the configured one
//! - `-v`: More logging (repeatable)
//!
//! # Example
//!
//! ```bash
//! stemma view --name "Anna Smith" -b 2 -f 1
//! stemma --json view --id p17
//! stemma search smith
//! stemma check
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{CheckArgs, InfoArgs, InitArgs, RootsArgs, SearchArgs, ShowArgs, ViewArgs};
pub use validators::{validate_name_query, validate_person_id};

/// Stemma - family tree traversal and layout
///
/// Loads person rows from a JSON Lines file, selects the people around a
/// root person (or the complete tree), assigns generations and groups
/// couples into unions ready for drawing.
#[derive(Parser, Debug)]
#[command(name = "stemma")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: nearest stemma.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data file, overriding the config's data-file
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default stemma.yaml
    ///
    /// Creates `stemma.yaml` in the current directory, plus an empty data
    /// file if the configured one does not exist yet.
    Init(InitArgs),

    /// Show a family view
    ///
    /// With `--id` or `--name`, shows the root, their spouse, and the given
    /// number of ancestor and descendant generations. With neither, shows
    /// the complete tree.
    View(ViewArgs),

    /// Find people by name
    ///
    /// Case-insensitive. Exact matches are listed before partial ones.
    Search(SearchArgs),

    /// Show one person
    ///
    /// Displays the record with resolved parents, spouse and children.
    Show(ShowArgs),

    /// List root ancestors
    ///
    /// People with no known parents who did not marry into a family with
    /// known parents, one per couple.
    Roots(RootsArgs),

    /// Report data quality warnings
    ///
    /// Lists malformed rows, duplicate IDs, dangling references and
    /// ancestry cycles. Always exits successfully.
    Check(CheckArgs),

    /// Show config and data summary
    Info(InfoArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Where config and data come from, per the global flags.
    #[must_use]
    pub fn sources(&self) -> crate::app::Sources {
        crate::app::Sources {
            config: self.config.clone(),
            data: self.data.clone(),
        }
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the config or data cannot be loaded, a requested
    /// person does not exist, or output fails.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let current_dir = std::env::current_dir()?;

        let sources = self.sources();

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(&current_dir, args).await,
            Some(Commands::View(args)) => {
                let app = App::load(&current_dir, &sources).await?;
                execute::execute_view(&app, args, output_mode)
            }
            Some(Commands::Search(args)) => {
                let app = App::load(&current_dir, &sources).await?;
                execute::execute_search(&app, args, output_mode)
            }
            Some(Commands::Show(args)) => {
                let app = App::load(&current_dir, &sources).await?;
                execute::execute_show(&app, args, output_mode)
            }
            Some(Commands::Roots(args)) => {
                let app = App::load(&current_dir, &sources).await?;
                execute::execute_roots(&app, args, output_mode)
            }
            Some(Commands::Check(args)) => {
                let app = App::load(&current_dir, &sources).await?;
                execute::execute_check(&app, args, output_mode)
            }
            Some(Commands::Info(args)) => {
                let app = App::load(&current_dir, &sources).await?;
                execute::execute_info(&app, args, output_mode)
            }
            None => {
                println!("Stemma family tree viewer");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::RootQuery;
    use rstest::rstest;

    // ========== CLI Parsing Tests ==========

    #[test]
    fn parse_no_command() {
        let cli = Cli::try_parse_from(["stemma"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stemma", "check", "--json", "--data", "x.jsonl", "--config", "c.yaml", "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        let sources = cli.sources();
        assert_eq!(sources.data, Some(PathBuf::from("x.jsonl")));
        assert_eq!(sources.config, Some(PathBuf::from("c.yaml")));
        assert!(matches!(cli.command, Some(Commands::Check(_))));
    }

    #[test]
    fn parse_view_complete_tree() {
        let cli = Cli::try_parse_from(["stemma", "view"]).unwrap();
        match cli.command {
            Some(Commands::View(args)) => {
                assert!(args.root().is_none());
                assert!(args.generations_back.is_none());
                assert!(args.generations_forward.is_none());
            }
            _ => panic!("Expected View command"),
        }
    }

    #[test]
    fn parse_view_by_name_with_limits() {
        let cli =
            Cli::try_parse_from(["stemma", "view", "--name", " Anna ", "-b", "2", "--forward", "1"])
                .unwrap();
        match cli.command {
            Some(Commands::View(args)) => {
                assert_eq!(args.root(), Some(RootQuery::Name("Anna".to_string())));
                assert_eq!(args.generations_back, Some(2));
                assert_eq!(args.generations_forward, Some(1));
            }
            _ => panic!("Expected View command"),
        }
    }

    #[test]
    fn parse_view_by_id() {
        let cli = Cli::try_parse_from(["stemma", "view", "--id", "p7"]).unwrap();
        match cli.command {
            Some(Commands::View(args)) => {
                assert_eq!(args.root(), Some(RootQuery::Id("p7".into())));
            }
            _ => panic!("Expected View command"),
        }
    }

    #[rstest]
    #[case::id_and_name(&["stemma", "view", "--id", "p1", "--name", "Anna"])]
    #[case::negative_limit(&["stemma", "view", "--id", "p1", "-b", "-1"])]
    #[case::blank_id(&["stemma", "view", "--id", "  "])]
    #[case::search_without_query(&["stemma", "search"])]
    #[case::blank_query(&["stemma", "search", ""])]
    #[case::show_without_id(&["stemma", "show"])]
    fn parse_rejects(#[case] argv: &[&str]) {
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn parse_init_with_data_file() {
        let cli = Cli::try_parse_from(["stemma", "init", "--data-file", "tree.jsonl", "-q"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.data_file, Some(PathBuf::from("tree.jsonl")));
                assert!(args.quiet);
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_search_and_show() {
        let cli = Cli::try_parse_from(["stemma", "search", "smith"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Search(a)) if a.query == "smith"));

        let cli = Cli::try_parse_from(["stemma", "show", "p3"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Show(a)) if a.person_id == "p3"));
    }

    #[rstest]
    #[case::roots("roots")]
    #[case::check("check")]
    #[case::info("info")]
    fn parse_argumentless_commands(#[case] name: &str) {
        let cli = Cli::try_parse_from(["stemma", name]).unwrap();
        assert!(cli.command.is_some());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
