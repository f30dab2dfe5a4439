use serde_json::Value;

use crate::engine::{
    models::generation_request::GenerationRequest, runner::CommandRunner, service::Engine,
};

use super::{dtos::job_input_dto::JobInputDto, errors::JobError, models::job_output::JobOutput};

/// Entry point registered with the queue runtime. Every failure is folded into
/// `{error}` here; nothing escapes as an `Err`.
pub async fn handle<R: CommandRunner>(input: Value, engine: &Engine<R>) -> JobOutput {
    match run(input, engine).await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("job failed: {}", e);
            JobOutput::Failure {
                error: e.to_string(),
            }
        }
    }
}

async fn run<R: CommandRunner>(input: Value, engine: &Engine<R>) -> Result<JobOutput, JobError> {
    let request = parse_input(input)?;

    tracing::info!(
        steps = request.steps,
        guidance_scale = request.guidance_scale,
        seed = request.seed,
        "generating image for: {}",
        request.prompt
    );

    let result = engine.generate(&request).await?;

    Ok(JobOutput::Success(result))
}

pub fn parse_input(input: Value) -> Result<GenerationRequest, JobError> {
    let dto: JobInputDto = serde_json::from_value(input)?;

    Ok(dto.to_generation_request())
}
