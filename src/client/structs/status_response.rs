use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: Option<String>,
    /// Left untyped: a completed job may carry an image, an error, or neither.
    pub output: Option<Value>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletedOutput {
    pub image: Option<String>,
    pub error: Option<String>,
}
