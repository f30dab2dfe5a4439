use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Base64 of the raw file produced by the tool.
    pub image: String,
    pub prompt: String,
    /// The seed as supplied, which is -1 when the tool picked one.
    pub seed: i64,
}
