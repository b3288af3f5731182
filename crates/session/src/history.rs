use serde::Serialize;

/// One completed model invocation. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictRow {
    pub file_name: String,
    pub likelihood: String,
    pub decision: String,
    pub response: String,
    pub model: String,
}

/// One iteration that failed after retries. Kept in the table so the export
/// shows exactly which slots produced nothing.
#[derive(Debug, Clone, Serialize)]
pub struct FailedRow {
    pub file_name: String,
    pub iteration: usize,
    pub error: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunRecord {
    Completed(VerdictRow),
    Failed(FailedRow),
}

/// The accumulating result table: insertion-ordered, unbounded, reset only
/// when the submitted document changes.
#[derive(Debug, Default, Clone)]
pub struct ResponseHistory {
    rows: Vec<RunRecord>,
}

impl ResponseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_verdict(&mut self, row: VerdictRow) {
        self.rows.push(RunRecord::Completed(row));
    }

    pub fn push_failed(&mut self, row: FailedRow) {
        self.rows.push(RunRecord::Failed(row));
    }

    pub fn reset(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[RunRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, RunRecord::Completed(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, RunRecord::Failed(_)))
            .count()
    }
}
