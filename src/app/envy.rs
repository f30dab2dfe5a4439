use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Envy {
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub port: Option<u16>,
    pub api_key: Option<String>,

    pub hf_token: Option<String>,

    #[serde(default = "default_diffusion_dir")]
    pub diffusion_dir: String,
    #[serde(default = "default_diffusion_python")]
    pub diffusion_python: String,
    #[serde(default = "default_diffusion_script")]
    pub diffusion_script: String,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    #[serde(default = "default_onnx_dir")]
    pub onnx_dir: String,
    #[serde(default = "default_engine_dir")]
    pub engine_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_job_retention_secs")]
    pub job_retention_secs: u64,

    pub runpod_webhook_get_job: Option<String>,
    pub runpod_webhook_post_output: Option<String>,
    pub runpod_ai_api_key: Option<String>,
    pub runpod_pod_id: Option<String>,
    pub runpod_webhook_ping: Option<String>,
    #[serde(default = "default_runpod_ping_interval")]
    pub runpod_ping_interval: u64,
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_diffusion_dir() -> String {
    "/workspace/TensorRT/demo/Diffusion".to_string()
}

fn default_diffusion_python() -> String {
    "python3".to_string()
}

fn default_diffusion_script() -> String {
    "demo_txt2img_sd35.py".to_string()
}

fn default_model_version() -> String {
    "3.5-large".to_string()
}

fn default_onnx_dir() -> String {
    "/workspace/models/onnx_fp8".to_string()
}

fn default_engine_dir() -> String {
    "/workspace/models/engine_fp8".to_string()
}

fn default_output_dir() -> String {
    "/tmp/output".to_string()
}

fn default_job_retention_secs() -> u64 {
    1800
}

fn default_runpod_ping_interval() -> u64 {
    10000
}

impl Envy {
    /// Serverless mode is selected when the platform injected its job-take webhook.
    pub fn is_serverless(&self) -> bool {
        self.runpod_webhook_get_job.is_some()
    }
}
