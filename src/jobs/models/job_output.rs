use serde::Serialize;

use crate::engine::models::generation_result::GenerationResult;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JobOutput {
    Success(GenerationResult),
    Failure { error: String },
}

impl JobOutput {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_serializes_flat() {
        let output = JobOutput::Success(GenerationResult {
            image: "aGk=".to_string(),
            prompt: "a cat".to_string(),
            seed: -1,
        });

        assert_eq!(
            serde_json::to_value(&output).expect("serialize"),
            json!({ "image": "aGk=", "prompt": "a cat", "seed": -1 })
        );
    }

    #[test]
    fn failure_serializes_only_error() {
        let output = JobOutput::Failure {
            error: "boom".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&output).expect("serialize"),
            json!({ "error": "boom" })
        );
        assert_eq!(output.error(), Some("boom"));
        assert!(!output.is_success());
    }
}
