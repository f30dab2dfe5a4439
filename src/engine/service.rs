use std::path::Path;

use tokio::{fs, sync::OnceCell};
use uuid::Uuid;

use super::{
    args,
    config::EngineConfig,
    errors::GenerationError,
    models::{generation_request::GenerationRequest, generation_result::GenerationResult},
    output,
    runner::CommandRunner,
};

/// Owns the one-time engine build and runs generations against it.
pub struct Engine<R> {
    config: EngineConfig,
    runner: R,
    ready: OnceCell<()>,
}

impl<R: CommandRunner> Engine<R> {
    pub fn new(config: EngineConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            ready: OnceCell::new(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Builds the engines on first use. Concurrent callers wait on the same
    /// build; a failed build leaves the cell empty so the next call retries.
    pub async fn ensure_ready(&self) -> Result<(), GenerationError> {
        self.ready
            .get_or_try_init(|| self.build_engines())
            .await
            .map(|_| ())
    }

    async fn build_engines(&self) -> Result<(), GenerationError> {
        if self.config.hf_token.is_none() {
            tracing::warn!("HF_TOKEN is not set, model download may fail");
        }

        tracing::info!("building TensorRT engines (10-20 minutes on first run)");

        let command = args::setup_command(&self.config);
        let outcome = self.runner.run(&command).await?;

        if !outcome.success {
            tracing::error!("engine build exited with {:?}", outcome.code);
            return Err(GenerationError::SetupFailed { code: outcome.code });
        }

        tracing::info!("engines built successfully");
        Ok(())
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        self.ensure_ready().await?;

        let output_dir = self.config.output_root.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&output_dir).await?;

        let result = self.generate_into(request, &output_dir).await;

        if let Err(e) = fs::remove_dir_all(&output_dir).await {
            tracing::warn!("failed to remove {}: {}", output_dir.display(), e);
        }

        result
    }

    async fn generate_into(
        &self,
        request: &GenerationRequest,
        output_dir: &Path,
    ) -> Result<GenerationResult, GenerationError> {
        let command = args::generation_command(&self.config, request, output_dir);
        let outcome = self.runner.run(&command).await?;

        if !outcome.success {
            tracing::error!("generation exited with {:?}", outcome.code);
            return Err(GenerationError::GenerationFailed { code: outcome.code });
        }

        let bytes = output::take_output(output_dir).await?;
        tracing::debug!("generated {} bytes", bytes.len());

        Ok(GenerationResult {
            image: base64::encode(bytes),
            prompt: request.prompt.to_string(),
            seed: request.seed,
        })
    }
}
