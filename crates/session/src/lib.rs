pub mod cache;
pub mod error;
pub mod history;
pub mod pacing;
pub mod retry;
pub mod runner;
pub mod session;

pub use cache::ContextCache;
pub use error::SessionError;
pub use history::{FailedRow, ResponseHistory, RunRecord, VerdictRow};
pub use pacing::PacingPolicy;
pub use retry::RetryPolicy;
pub use runner::{BatchOutcome, BatchRequest, BatchRunner, FailurePolicy, RunnerConfig};
pub use session::Session;
