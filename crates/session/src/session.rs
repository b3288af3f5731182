use crate::history::ResponseHistory;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Per-session state: the document marker, the accumulating result table and
/// the export artifact path. One of these exists per connected user; nothing
/// here is process-global.
pub struct Session {
    previous_file: Option<String>,
    history: ResponseHistory,
    export_path: PathBuf,
}

impl Session {
    pub fn new(export_path: PathBuf) -> Self {
        Self {
            previous_file: None,
            history: ResponseHistory::new(),
            export_path,
        }
    }

    /// Reset-on-change: a new document invalidates the table and any export
    /// artifact produced for the previous one.
    pub fn prepare_for(&mut self, document_path: &str) -> std::io::Result<()> {
        if self.previous_file.as_deref() != Some(document_path) {
            if self.export_path.exists() {
                fs::remove_file(&self.export_path)?;
                info!(path = %self.export_path.display(), "removed stale export");
            }
            self.history.reset();
            self.previous_file = Some(document_path.to_string());
        }
        Ok(())
    }

    pub fn history(&self) -> &ResponseHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ResponseHistory {
        &mut self.history
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn previous_file(&self) -> Option<&str> {
        self.previous_file.as_deref()
    }
}
