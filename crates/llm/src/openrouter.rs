//! OpenRouter client: one endpoint that fronts Llama and Claude.

use crate::error::LlmError;
use crate::sampling::CompletionOptions;
use crate::ChatModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// The two routed juror models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterModel {
    Llama,
    Claude,
}

impl RouterModel {
    pub fn slug(&self) -> &'static str {
        match self {
            RouterModel::Llama => "meta-llama/llama-3.1-405b-instruct",
            RouterModel::Claude => "anthropic/claude-3.5-sonnet",
        }
    }
}

#[derive(Clone)]
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    model: RouterModel,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct RouterRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
    repetition_penalty: f64,
    top_k: u32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct RouterResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: RouterModel) -> Self {
        Self {
            api_key,
            base_url: OPENROUTER_API_URL.to_string(),
            model,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    fn model_id(&self) -> String {
        self.model.slug().to_string()
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let request = RouterRequest {
            model: self.model.slug().to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: options.sampling.temperature,
            top_p: options.sampling.top_p,
            frequency_penalty: options.sampling.frequency_penalty,
            presence_penalty: options.sampling.presence_penalty,
            repetition_penalty: options.sampling.repetition_penalty,
            top_k: options.sampling.top_k,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status.as_u16(), body));
        }

        let completion: RouterResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("empty choices array".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_slugs() {
        assert_eq!(RouterModel::Llama.slug(), "meta-llama/llama-3.1-405b-instruct");
        assert_eq!(RouterModel::Claude.slug(), "anthropic/claude-3.5-sonnet");
    }

    #[test]
    fn test_router_request_carries_extended_sampling() {
        let request = RouterRequest {
            model: RouterModel::Claude.slug().to_string(),
            messages: vec![],
            temperature: 0.8,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            repetition_penalty: 1.1,
            top_k: 0,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""repetition_penalty":1.1"#));
        assert!(json.contains(r#""top_k":0"#));
    }
}
