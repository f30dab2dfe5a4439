#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub steps: i64,
    pub guidance_scale: f64,
    pub seed: i64,
}

impl GenerationRequest {
    /// An empty negative prompt means "omit the flag".
    pub fn negative_prompt(&self) -> Option<&str> {
        match self.negative_prompt.is_empty() {
            true => None,
            false => Some(&self.negative_prompt),
        }
    }

    /// Negative seeds let the tool choose.
    pub fn explicit_seed(&self) -> Option<i64> {
        match self.seed >= 0 {
            true => Some(self.seed),
            false => None,
        }
    }
}
