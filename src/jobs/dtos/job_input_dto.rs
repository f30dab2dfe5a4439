use serde::{Deserialize, Serialize};

use crate::engine::models::generation_request::GenerationRequest;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobInputDto {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
    #[serde(default = "default_steps")]
    pub steps: i64,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[serde(default = "default_seed")]
    pub seed: i64,
}

fn default_prompt() -> String {
    "A beautiful landscape".to_string()
}

fn default_steps() -> i64 {
    30
}

fn default_guidance_scale() -> f64 {
    3.5
}

fn default_seed() -> i64 {
    -1
}

impl Default for JobInputDto {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            negative_prompt: String::new(),
            steps: default_steps(),
            guidance_scale: default_guidance_scale(),
            seed: default_seed(),
        }
    }
}

impl JobInputDto {
    pub fn to_generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.to_string(),
            negative_prompt: self.negative_prompt.to_string(),
            steps: self.steps,
            guidance_scale: self.guidance_scale,
            seed: self.seed,
        }
    }
}
