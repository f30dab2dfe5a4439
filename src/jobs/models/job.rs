use serde::Deserialize;
use serde_json::Value;

/// A job as handed out by the queue platform.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub input: Value,
}
