use thiserror::Error;

/// Failure taxonomy for a model call. A bad credential is never worth
/// retrying; rate limits, transport failures and 5xx responses are.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Credential rejected by the backend (401/403)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Backend throttled the request (429)
    #[error("rate limit exceeded")]
    RateLimit,

    /// Transport-level failure before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// 2xx response whose body did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimit | LlmError::Network(_) => true,
            LlmError::Upstream { status, .. } => *status >= 500,
            LlmError::Auth(_) | LlmError::InvalidResponse(_) => false,
        }
    }

    /// Map an HTTP status to the matching variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => LlmError::Auth(body),
            429 => LlmError::RateLimit,
            _ => LlmError::Upstream { status, body },
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Network(e.to_string())
    }
}
