//! Error types for stemma-rows operations.

use std::io;
use thiserror::Error;

/// The error type for row loading.
///
/// Only structural failures are errors. Individual bad lines are reported
/// as [`Warning`](crate::Warning)s and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input is not line-oriented row data at all.
    #[error("Invalid row format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for stemma-rows operations.
pub type Result<T> = std::result::Result<T, Error>;
