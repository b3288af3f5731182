pub mod error;
pub mod openai;
pub mod openrouter;
pub mod sampling;

pub use error::LlmError;
pub use openai::OpenAiClient;
pub use openrouter::{OpenRouterClient, RouterModel};
pub use sampling::{CompletionOptions, SamplingConfig};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Model used when the caller does not pick one.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// A chat-completion backend. The juror call and the structured-extraction
/// call both go through this, so the loop never cares which HTTP API is
/// behind it.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier recorded next to every result row
    fn model_id(&self) -> String;

    /// One system+user exchange, returning the raw assistant text
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;
}

/// Scripted in-memory backend for tests. Pops queued responses in order and
/// falls back to a fixed default once the script runs out.
#[derive(Clone)]
pub struct MockModel {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockModel {
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            default_response: default_response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn push_response(&self, response: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(response.into()));
    }

    pub fn push_error(&self, error: LlmError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    fn model_id(&self) -> String {
        "mock".to_string()
    }

    async fn complete(
        &self,
        _system: &str,
        _user: &str,
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        match self.script.lock().unwrap().pop_front() {
            Some(step) => step,
            None => Ok(self.default_response.clone()),
        }
    }
}
