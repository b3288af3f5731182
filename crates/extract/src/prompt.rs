/// System prompt for the reformat call: pin the model to the two-key JSON
/// shape and nothing else.
pub fn build_extraction_system_prompt() -> String {
    r#"Answer the question of the user on the basis of provided context in the Structured JSON format as provided below:
{"Likelihood": "", "Decision": ""}
Output ONLY the JSON object, no markdown, no explanations, no other keys."#
        .to_string()
}

/// User prompt wrapping the juror model's free-text verdict.
pub fn build_extraction_user_prompt(verdict_text: &str) -> String {
    format!(
        r#"Extract the Likelihood (out of 100), and defendant's Decision either he/she is guilty or innocent from the provided context. The Decision must be either "Guilty" or "Innocent".

Context:

{}"#,
        verdict_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_embeds_verdict() {
        let prompt = build_extraction_user_prompt("70% likely guilty");
        assert!(prompt.contains("70% likely guilty"));
        assert!(prompt.contains("Likelihood"));
    }
}
