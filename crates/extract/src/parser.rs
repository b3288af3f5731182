//! Parse the reformat call's output into a `Verdict`.

use crate::error::ExtractError;
use crate::schema::Verdict;
use serde_json::Value;

/// Parse a model response into a verdict record. Exactly the keys
/// `Likelihood` and `Decision` are accepted; anything else is a parse error
/// rather than a silently fabricated row.
pub fn parse_verdict(response: &str) -> Result<Verdict, ExtractError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractError::Parse(format!("invalid JSON: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractError::Parse("expected a JSON object".to_string()))?;

    for key in obj.keys() {
        if key != "Likelihood" && key != "Decision" {
            return Err(ExtractError::Parse(format!("unexpected key: {}", key)));
        }
    }

    let likelihood = match obj.get("Likelihood") {
        Some(Value::String(s)) => s.clone(),
        // Models often answer with a bare number despite the string contract
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(ExtractError::Parse(format!(
                "Likelihood has unexpected type: {}",
                other
            )));
        }
        None => return Err(ExtractError::Parse("missing key: Likelihood".to_string())),
    };

    let decision = obj
        .get("Decision")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractError::Parse("missing or non-string key: Decision".to_string()))?
        .to_string();

    Ok(Verdict {
        likelihood,
        decision,
    })
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn extract_json(response: &str) -> Result<String, ExtractError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractError::Parse("empty code block".to_string()));
        }
        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
