//! Turns match outcomes into what the user sees.

use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};
use crate::matcher::MatchResult;

/// Shown when no catalog entry clears the threshold.
pub const NO_MATCH_NOTICE: &str =
    "No close match found. Please consult a doctor for proper advice.";

/// Shown when the user submits blank input.
pub const EMPTY_INPUT_WARNING: &str = "Please enter your symptoms first.";

/// One rendered response to a submitted query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    /// Best-matching advice.
    Advice {
        symptom: String,
        advice: String,
        score: f32,
    },
    /// Informational: the symptoms were understood but nothing matched.
    NoMatch { message: String },
    /// The input was blank.
    Warning { message: String },
    /// The advisor could not answer this query.
    Failure { message: String },
}

impl Answer {
    /// Whether the answer should go to stderr rather than stdout.
    pub fn is_problem(&self) -> bool {
        matches!(self, Answer::Warning { .. } | Answer::Failure { .. })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Advice {
                symptom, advice, ..
            } => write!(f, "Matched symptom: {}\n{}", symptom, advice),
            Answer::NoMatch { message } => write!(f, "{}", message),
            Answer::Warning { message } => write!(f, "Warning: {}", message),
            Answer::Failure { message } => write!(f, "Error: {}", message),
        }
    }
}

/// Render the outcome of one query.
///
/// Every error becomes an [`Answer`] so a running prompt keeps serving.
pub fn present(outcome: Result<MatchResult>) -> Answer {
    match outcome {
        Ok(MatchResult::Matched { entry, score }) => Answer::Advice {
            symptom: entry.symptom_text,
            advice: entry.advice_text,
            score,
        },
        Ok(MatchResult::NoMatch { .. }) => Answer::NoMatch {
            message: NO_MATCH_NOTICE.to_string(),
        },
        Err(Error::EmptyQuery) => Answer::Warning {
            message: EMPTY_INPUT_WARNING.to_string(),
        },
        Err(e) => Answer::Failure {
            message: format!("could not analyse your symptoms right now ({})", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    #[test]
    fn test_present_match() {
        let entry = CatalogEntry::new("fever and headache", "Take rest and stay hydrated.").unwrap();
        let answer = present(Ok(MatchResult::Matched { entry, score: 0.9 }));

        assert_eq!(
            answer.to_string(),
            "Matched symptom: fever and headache\nTake rest and stay hydrated."
        );
        assert!(!answer.is_problem());
    }

    #[test]
    fn test_present_no_match_is_informational() {
        let answer = present(Ok(MatchResult::NoMatch { best_score: 0.2 }));
        assert_eq!(answer.to_string(), NO_MATCH_NOTICE);
        assert!(!answer.is_problem());
    }

    #[test]
    fn test_present_empty_query_warns() {
        let answer = present(Err(Error::EmptyQuery));
        assert_eq!(answer.to_string(), "Warning: Please enter your symptoms first.");
        assert!(answer.is_problem());
    }

    #[test]
    fn test_embedding_failure_differs_from_no_match() {
        let answer = present(Err(Error::Embedding("model unavailable".into())));
        match &answer {
            Answer::Failure { message } => assert!(message.contains("model unavailable")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_ne!(answer.to_string(), NO_MATCH_NOTICE);
    }

    #[test]
    fn test_every_query_error_is_rendered() {
        let errors = [
            Error::DimensionMismatch {
                expected: 8,
                actual: 1,
            },
            Error::ModelMismatch {
                index: "hashing-384".into(),
                provider: "hashing-128".into(),
            },
            Error::Timeout { duration_ms: 50 },
            Error::EmptyCatalog,
        ];
        for err in errors {
            let expected = err.to_string();
            match present(Err(err)) {
                Answer::Failure { message } => assert!(message.contains(&expected)),
                other => panic!("expected failure, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_json_shape() {
        let json = present(Ok(MatchResult::NoMatch { best_score: 0.1 }))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "no_match");
        assert_eq!(value["message"], NO_MATCH_NOTICE);
    }
}
