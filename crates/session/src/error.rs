use ingest::LoaderError;
use thiserror::Error;

/// Batch-level failures. Per-iteration failures are recorded in the result
/// table instead, unless the abort policy promotes them to this level.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Requested more iterations than the configured cap allows
    #[error("iteration count {requested} exceeds the configured cap of {max}")]
    TooManyIterations { requested: usize, max: usize },

    /// Credential rejected; aborts immediately without consuming budget
    #[error("credential rejected: {0}")]
    Credential(String),

    /// The document could not be read at all
    #[error("document loader failed: {0}")]
    Loader(#[from] LoaderError),

    /// First failed iteration under the abort policy
    #[error("iteration {iteration} failed: {message}")]
    IterationFailed { iteration: usize, message: String },

    /// Filesystem error while resetting the export artifact
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
