//! Non-fatal problems found while reading rows.
//!
//! A [`Warning`] describes one line that could not be turned into a row.
//! Readers push warnings into a shared [`WarningCollector`] while the row
//! stream is being consumed, and callers drain it once the stream ends.
//!
//! ```
//! use stemma_rows::warning::{Warning, WarningCollector};
//!
//! let collector = WarningCollector::new();
//! collector.add(Warning::MalformedRow {
//!     line_number: 3,
//!     error: "expected `,` or `}`".to_string(),
//! });
//!
//! let warnings = collector.into_warnings();
//! assert_eq!(warnings[0].line_number(), 3);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

/// One skipped input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line was not a JSON object of the expected row shape.
    MalformedRow {
        /// 1-based line number.
        line_number: usize,
        /// Parser message.
        error: String,
    },

    /// The line could not be read as text at all.
    SkippedLine {
        /// 1-based line number.
        line_number: usize,
        /// Why the line was dropped.
        reason: String,
    },
}

impl Warning {
    /// Line the warning refers to.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedRow { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Human-readable one-line summary, prefixed with the line number.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedRow { line_number, error } => {
                format!("line {line_number}: malformed row: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => format!("line {line_number}: skipped: {reason}"),
        }
    }

    /// Stable identifier for grouping warnings without matching on variants.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRow { .. } => "malformed_row",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

impl std::error::Error for Warning {}

/// Shared sink for warnings produced while a row stream is polled.
///
/// Clones share the same storage, so a clone can be moved into the stream
/// while the caller keeps the original to read results afterwards.
///
/// A poisoned lock is recovered rather than propagated: the stored warnings
/// are plain data and stay valid even if another holder panicked.
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn add(&self, warning: Warning) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }

    /// Number of warnings recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the recorded warnings, leaving the collector usable.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consumes the collector, returning the warnings in the order recorded.
    ///
    /// Moves the vector out when this is the last handle and clones it
    /// otherwise.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        match Arc::try_unwrap(self.warnings) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}
