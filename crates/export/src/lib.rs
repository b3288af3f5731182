//! CSV export of a session's result table.
//!
//! Each call rewrites the whole file from the in-memory table, so the export
//! is always an exact snapshot: no stale rows, no append semantics.

use anyhow::{Context, Result};
use session::{ResponseHistory, RunRecord};
use std::path::Path;

const HEADERS: [&str; 6] = [
    "file_name",
    "Likelihood",
    "Decision",
    "Response",
    "Model",
    "Error",
];

/// Serialize the result table to `path`, truncating any previous export.
pub fn write_history(history: &ResponseHistory, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create export file: {}", path.display()))?;

    writer.write_record(HEADERS)?;

    for record in history.rows() {
        match record {
            RunRecord::Completed(row) => {
                writer.write_record([
                    row.file_name.as_str(),
                    row.likelihood.as_str(),
                    row.decision.as_str(),
                    row.response.as_str(),
                    row.model.as_str(),
                    "",
                ])?;
            }
            RunRecord::Failed(row) => {
                writer.write_record([
                    row.file_name.as_str(),
                    "",
                    "",
                    "",
                    row.model.as_str(),
                    row.error.as_str(),
                ])?;
            }
        }
    }

    writer.flush().context("failed to flush export file")?;
    Ok(())
}
