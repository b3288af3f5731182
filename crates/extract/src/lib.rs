pub mod error;
pub mod parser;
pub mod prompt;
pub mod schema;

pub use error::ExtractError;
pub use parser::parse_verdict;
pub use schema::{Decision, Verdict};

use llm::{ChatModel, CompletionOptions};
use tracing::debug;

/// Normalizes a free-text verdict into a `Verdict` record by asking a second
/// model to reformat it. A deterministic parser could be swapped in behind
/// the same signature; the failure mode (ParseError) would not change.
pub struct StructuredExtractor<M: ChatModel> {
    model: M,
}

impl<M: ChatModel> StructuredExtractor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub async fn extract(&self, verdict_text: &str) -> Result<Verdict, ExtractError> {
        let system = prompt::build_extraction_system_prompt();
        let user = prompt::build_extraction_user_prompt(verdict_text);

        let response = self
            .model
            .complete(&system, &user, &CompletionOptions::json())
            .await?;

        debug!(model = %self.model.model_id(), "structured extraction response received");

        parse_verdict(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm::{LlmError, MockModel};

    #[tokio::test]
    async fn test_extract_well_formed() {
        let model = MockModel::new(r#"{"Likelihood": "70", "Decision": "Guilty"}"#);
        let extractor = StructuredExtractor::new(model);

        let verdict = extractor
            .extract("The defendant appears 70% likely guilty; verdict: Guilty")
            .await
            .unwrap();
        assert_eq!(verdict.likelihood, "70");
        assert_eq!(verdict.decision_normalized(), Some(Decision::Guilty));
    }

    #[tokio::test]
    async fn test_extract_malformed_is_parse_error() {
        let model = MockModel::new("I cannot answer in JSON, sorry.");
        let extractor = StructuredExtractor::new(model);

        let err = extractor.extract("some verdict").await.unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[tokio::test]
    async fn test_extract_propagates_llm_error() {
        let model = MockModel::new("unused");
        model.push_error(LlmError::RateLimit);
        let extractor = StructuredExtractor::new(model);

        let err = extractor.extract("some verdict").await.unwrap_err();
        assert!(matches!(err, ExtractError::Llm(LlmError::RateLimit)));
    }
}
