use serde::{Deserialize, Serialize};

/// Sampling knobs forwarded to the backend. Defaults mirror what the juror
/// prompts were tuned against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub repetition_penalty: f64,
    pub top_k: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            repetition_penalty: 1.1,
            top_k: 0,
        }
    }
}

/// Per-call options carried alongside the prompt pair.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    /// Ask the backend for a JSON object body (structured extraction)
    pub json_mode: bool,
    pub sampling: SamplingConfig,
}

impl CompletionOptions {
    pub fn json() -> Self {
        Self {
            json_mode: true,
            sampling: SamplingConfig::default(),
        }
    }
}
