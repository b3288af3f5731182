use serde::{Deserialize, Serialize};

/// The two-field record the extraction call must produce. Likelihood is kept
/// as the raw string the model gave us (expected 0-100, never validated);
/// decision is the raw text with a normalizer on the side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "Likelihood")]
    pub likelihood: String,
    #[serde(rename = "Decision")]
    pub decision: String,
}

impl Verdict {
    /// Map the free-text decision onto the two enumerated outcomes.
    pub fn decision_normalized(&self) -> Option<Decision> {
        Decision::parse(&self.decision)
    }
}

/// Dichotomous classification attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Guilty,
    Innocent,
}

impl Decision {
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned = text
            .trim()
            .trim_matches(|c: char| c.is_ascii_punctuation())
            .to_lowercase();
        match cleaned.as_str() {
            "guilty" => Some(Decision::Guilty),
            "innocent" => Some(Decision::Innocent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Guilty => "Guilty",
            Decision::Innocent => "Innocent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parse_variants() {
        assert_eq!(Decision::parse("Guilty"), Some(Decision::Guilty));
        assert_eq!(Decision::parse("  guilty. "), Some(Decision::Guilty));
        assert_eq!(Decision::parse("'Innocent'"), Some(Decision::Innocent));
        assert_eq!(Decision::parse("undecided"), None);
    }

    #[test]
    fn test_verdict_normalization() {
        let verdict = Verdict {
            likelihood: "70".to_string(),
            decision: "GUILTY".to_string(),
        };
        assert_eq!(verdict.decision_normalized(), Some(Decision::Guilty));
    }
}
