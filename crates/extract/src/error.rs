use llm::LlmError;
use thiserror::Error;

/// Errors from the structured-extraction stage
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The reformat call itself failed
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    /// The reformat call answered, but not with the expected two-key object
    #[error("parse error: {0}")]
    Parse(String),
}
