use std::path::Path;

use super::{
    config::EngineConfig, models::generation_request::GenerationRequest, runner::CommandSpec,
};

const SETUP_PROMPT: &str = "test prompt";
const SETUP_DENOISING_STEPS: u32 = 30;
const SETUP_GUIDANCE_SCALE: &str = "3.5";

/// Warmup generation that downloads the ONNX models and builds the FP8 engines.
pub fn setup_command(config: &EngineConfig) -> CommandSpec {
    let mut args = leading_args(config, SETUP_PROMPT);
    args.extend([
        format!("--denoising-steps={}", SETUP_DENOISING_STEPS),
        "--guidance-scale".to_string(),
        SETUP_GUIDANCE_SCALE.to_string(),
        "--download-onnx-models".to_string(),
    ]);
    args.extend(engine_args(config));

    command(config, args)
}

pub fn generation_command(
    config: &EngineConfig,
    request: &GenerationRequest,
    output_dir: &Path,
) -> CommandSpec {
    let mut args = leading_args(config, &request.prompt);
    args.extend([
        format!("--denoising-steps={}", request.steps),
        // Debug keeps the trailing `.0` on whole numbers.
        format!("--guidance-scale={:?}", request.guidance_scale),
    ]);
    args.extend(engine_args(config));
    args.extend([
        "--output-dir".to_string(),
        output_dir.display().to_string(),
    ]);

    if let Some(negative_prompt) = request.negative_prompt() {
        args.extend(["--negative-prompt".to_string(), negative_prompt.to_string()]);
    }

    if let Some(seed) = request.explicit_seed() {
        args.extend(["--seed".to_string(), seed.to_string()]);
    }

    command(config, args)
}

fn leading_args(config: &EngineConfig, prompt: &str) -> Vec<String> {
    vec![
        config.script.to_string(),
        prompt.to_string(),
        format!("--version={}", config.model_version),
        "--fp8".to_string(),
    ]
}

fn engine_args(config: &EngineConfig) -> Vec<String> {
    vec![
        "--build-static-batch".to_string(),
        "--use-cuda-graph".to_string(),
        format!("--hf-token={}", config.hf_token.as_deref().unwrap_or_default()),
        "--onnx-dir".to_string(),
        config.onnx_dir.to_string(),
        "--engine-dir".to_string(),
        config.engine_dir.to_string(),
        "--num-warmup-runs".to_string(),
        "0".to_string(),
    ]
}

fn command(config: &EngineConfig, args: Vec<String>) -> CommandSpec {
    CommandSpec {
        program: config.python.to_string(),
        args,
        current_dir: config.working_dir.clone(),
    }
}
