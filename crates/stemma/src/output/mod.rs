//! Output formatting for CLI commands.
//!
//! Every command prints either human-readable text or JSON for programmatic
//! use. Text writers take any [`Write`] so they can be tested against a
//! buffer; the public dispatch functions lock stdout.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, markers)
//! - [`tree`]: Generation-ranked family tree rendering with ASCII/Unicode connectors

pub mod color;
pub mod tree;

use crate::domain::{PersonId, PersonRecord};
use crate::resolve::{Condition, NameMatches};
use crate::store::{LoadWarning, PersonStore};
use crate::view::FamilyView;
use serde::Serialize;
use serde_json::json;
use std::env;
use std::io::{self, Write};
use std::path::Path;

pub use color::{error, info, success, warning};
pub use tree::print_view_text;

use color::{bold, colorize_id, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

/// Configuration for output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only connectors and markers instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `STEMMA_ASCII`: Set to "1" or "true" for ASCII-only output (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `STEMMA_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`OutputConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_ascii = match lookup("STEMMA_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "STEMMA_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // https://no-color.org/
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("STEMMA_COLOR").is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
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

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a family view in the specified format
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_view(view: &FamilyView, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => print_view_text(&mut handle, view, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, view),
    }
}

/// Print name search results
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_matches(
    store: &PersonStore,
    query: &str,
    matches: &NameMatches,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            print_matches_text(&mut handle, store, query, matches, &OutputConfig::from_env())
        }
        OutputMode::Json => write_json(&mut handle, matches),
    }
}

/// Print complete-tree root ancestors
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_roots(store: &PersonStore, roots: &[PersonId], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => print_roots_text(&mut handle, store, roots, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, &json!({ "root_ancestors": roots })),
    }
}

/// Print load warnings
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_load_warnings(warnings: &[LoadWarning], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            print_load_warnings_text(&mut handle, warnings, &OutputConfig::from_env())
        }
        OutputMode::Json => write_json(
            &mut handle,
            &json!({ "count": warnings.len(), "warnings": warnings }),
        ),
    }
}

/// One person with their resolved relations, for `stemma show`.
#[derive(Debug, Clone, Serialize)]
pub struct PersonDetails<'a> {
    /// The stored record
    pub record: &'a PersonRecord,
    /// Parents that exist in the store, father first
    pub parents: Vec<&'a PersonId>,
    /// Spouse, if the reference resolves
    pub spouse: Option<&'a PersonId>,
    /// Children in store order
    pub children: Vec<&'a PersonId>,
}

/// Print one person's details
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_person(
    store: &PersonStore,
    details: &PersonDetails<'_>,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => print_person_text(&mut handle, store, details, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, details),
    }
}

/// Summary shown by `stemma info`.
#[derive(Debug, Clone, Serialize)]
pub struct DataSummary<'a> {
    /// Config file in use
    pub config_file: Option<&'a Path>,
    /// Data file loaded
    pub data_file: &'a Path,
    /// Number of people
    pub people: usize,
    /// Number of load warnings
    pub warnings: usize,
}

/// Print the data summary
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_summary(summary: &DataSummary<'_>, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => print_summary_text(&mut handle, summary, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, summary),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

pub(crate) fn print_conditions<W: Write>(
    w: &mut W,
    conditions: &[Condition],
    config: &OutputConfig,
) -> io::Result<()> {
    for condition in conditions {
        writeln!(w, "{} {condition}", warning("warning:", config))?;
    }
    Ok(())
}

fn person_line(store: &PersonStore, id: &PersonId, config: &OutputConfig) -> String {
    format!(
        "{} {}",
        colorize_id(id.as_str(), config),
        store.name_of(id)
    )
}

fn print_matches_text<W: Write>(
    w: &mut W,
    store: &PersonStore,
    query: &str,
    matches: &NameMatches,
    config: &OutputConfig,
) -> io::Result<()> {
    if matches.is_empty() {
        writeln!(w, "No people match '{query}'.")?;
        return Ok(());
    }

    for (title, ids) in [("Exact", &matches.exact), ("Partial", &matches.partial)] {
        if ids.is_empty() {
            continue;
        }
        writeln!(w, "{} ({}):", bold(title, config), ids.len())?;
        for id in ids {
            writeln!(w, "  {}", person_line(store, id, config))?;
        }
    }
    Ok(())
}

fn print_person_text<W: Write>(
    w: &mut W,
    store: &PersonStore,
    details: &PersonDetails<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    let record = details.record;
    writeln!(
        w,
        "{} {}",
        colorize_id(record.id.as_str(), config),
        bold(&record.display_name(), config)
    )?;

    let fields = [
        ("Born:", record.birth.as_deref()),
        ("Birthplace:", record.birth_place.as_deref()),
        ("Married:", record.marriage.as_deref()),
        ("Died:", record.death.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            writeln!(w, "  {} {value}", dimmed(label, config))?;
        }
    }
    let status = match record.living {
        Some(true) => "living",
        Some(false) => "deceased",
        None => "unknown",
    };
    writeln!(w, "  {} {status}", dimmed("Status:", config))?;

    if let Some(spouse) = details.spouse {
        writeln!(
            w,
            "  {} {}",
            dimmed("Spouse:", config),
            person_line(store, spouse, config)
        )?;
    }
    for (title, ids) in [("Parents", &details.parents), ("Children", &details.children)] {
        if ids.is_empty() {
            continue;
        }
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold(title, config), ids.len())?;
        for id in ids {
            writeln!(w, "  {}", person_line(store, id, config))?;
        }
    }
    Ok(())
}

fn print_roots_text<W: Write>(
    w: &mut W,
    store: &PersonStore,
    roots: &[PersonId],
    config: &OutputConfig,
) -> io::Result<()> {
    if roots.is_empty() {
        writeln!(w, "No root ancestors found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} root ancestor(s):", roots.len())?;
    for id in roots {
        let mut line = person_line(store, id, config);
        if let Some(spouse) = store.spouse_of(id) {
            line.push_str(&format!(
                " {} {}",
                dimmed("with", config),
                person_line(store, spouse, config)
            ));
        }
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

fn print_load_warnings_text<W: Write>(
    w: &mut W,
    warnings: &[LoadWarning],
    config: &OutputConfig,
) -> io::Result<()> {
    if warnings.is_empty() {
        writeln!(w, "{}", success("No problems found.", config))?;
        return Ok(());
    }

    writeln!(w, "Found {} problem(s):", warnings.len())?;
    for item in warnings {
        writeln!(w, "  {} {item}", warning(item.kind(), config))?;
    }
    Ok(())
}

fn print_summary_text<W: Write>(
    w: &mut W,
    summary: &DataSummary<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    let config_file = summary
        .config_file
        .map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string());
    writeln!(w, "{} {config_file}", dimmed("Config:", config))?;
    writeln!(
        w,
        "{} {}",
        dimmed("Data:", config),
        summary.data_file.display()
    )?;
    writeln!(w, "{} {}", dimmed("People:", config), summary.people)?;
    let count = summary.warnings.to_string();
    let count = if summary.warnings == 0 {
        count
    } else {
        warning(&count, config)
    };
    writeln!(w, "{} {count}", dimmed("Warnings:", config))
}
