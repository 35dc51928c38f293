//! Loading a [`PersonStore`] from a JSON Lines export.

use super::{LoadWarning, PersonStore};
use crate::domain::PersonRow;
use crate::error::Result;
use std::path::Path;
use stemma_rows::{read_rows_resilient, Warning};
use tracing::{info, warn};

/// Loads a person store from a JSON Lines file.
///
/// Lines that fail to parse are skipped and reported as
/// [`LoadWarning::MalformedRow`], followed by everything
/// [`PersonStore::load`] finds in the rows that did parse.
///
/// # Errors
///
/// Fails only when the file cannot be read or is not line-oriented at all.
pub async fn load_from_jsonl(path: &Path) -> Result<(PersonStore, Vec<LoadWarning>)> {
    let (rows, row_warnings) = read_rows_resilient::<PersonRow, _>(path).await?;

    let mut warnings: Vec<LoadWarning> = row_warnings
        .into_iter()
        .map(|warning| {
            warn!(%warning, "Skipped row");
            match warning {
                Warning::MalformedRow { line_number, error } => {
                    LoadWarning::MalformedRow { line_number, error }
                }
                Warning::SkippedLine {
                    line_number,
                    reason,
                } => LoadWarning::MalformedRow {
                    line_number,
                    error: reason,
                },
            }
        })
        .collect();

    let (store, mut store_warnings) = PersonStore::load(rows);
    warnings.append(&mut store_warnings);

    info!(
        path = %path.display(),
        people = store.len(),
        warnings = warnings.len(),
        "Loaded data file"
    );
    Ok((store, warnings))
}
