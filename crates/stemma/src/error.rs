//! Error types for stemma.
//!
//! Only failures that stop the pipeline are errors: an unreadable data file,
//! a config that cannot be parsed, a lookup the caller insisted on. Data
//! quality problems found while loading are [`LoadWarning`]s and per-request
//! problems are [`Condition`]s; both are returned as values.
//!
//! [`LoadWarning`]: crate::store::LoadWarning
//! [`Condition`]: crate::resolve::Condition

use crate::domain::PersonId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for stemma operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The row file could not be read.
    #[error("row loading error: {0}")]
    Rows(#[from] stemma_rows::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A person that must exist was not in the store.
    #[error("person not found: {0}")]
    PersonNotFound(PersonId),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML could not be parsed or produced.
    #[error("invalid configuration file: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("invalid configuration value: {0}")]
    Invalid(String),

    /// An explicitly requested config file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// `init` found a config file it would overwrite.
    #[error("configuration already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// A specialized Result type for stemma operations.
pub type Result<T> = std::result::Result<T, Error>;
