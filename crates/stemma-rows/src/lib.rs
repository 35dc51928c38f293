//! Resilient loading of person rows from JSON Lines files.
//!
//! Spreadsheet exports are rarely clean. This crate reads one JSON object per
//! line and keeps going when individual lines are broken: malformed lines are
//! skipped and reported as [`Warning`]s instead of aborting the whole load.
//!
//! # Example
//!
//! ```no_run
//! use serde::Deserialize;
//! use stemma_rows::read_rows_resilient;
//!
//! #[derive(Deserialize)]
//! struct Row {
//!     id: String,
//! }
//!
//! # async fn example() -> stemma_rows::Result<()> {
//! let (rows, warnings) = read_rows_resilient::<Row, _>("family.jsonl").await?;
//! for warning in &warnings {
//!     eprintln!("{warning}");
//! }
//! println!("loaded {} rows", rows.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod warning;

pub use error::{Error, Result};
pub use reader::{read_rows_resilient, RowReader};
pub use warning::{Warning, WarningCollector};
