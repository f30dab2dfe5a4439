use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `/run` and `/runsync`. `input` stays untyped until the handler
/// parses it so that bad input becomes a failed job rather than a 400.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunJobDto {
    #[serde(default)]
    pub input: Value,
}
