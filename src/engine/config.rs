use std::path::PathBuf;

use crate::app::envy::Envy;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub python: String,
    pub script: String,
    pub working_dir: PathBuf,
    pub model_version: String,
    pub onnx_dir: String,
    pub engine_dir: String,
    pub output_root: PathBuf,
    pub hf_token: Option<String>,
}

impl EngineConfig {
    pub fn from_envy(envy: &Envy) -> Self {
        Self {
            python: envy.diffusion_python.to_string(),
            script: envy.diffusion_script.to_string(),
            working_dir: PathBuf::from(&envy.diffusion_dir),
            model_version: envy.model_version.to_string(),
            onnx_dir: envy.onnx_dir.to_string(),
            engine_dir: envy.engine_dir.to_string(),
            output_root: PathBuf::from(&envy.output_dir),
            hf_token: envy.hf_token.clone(),
        }
    }
}
