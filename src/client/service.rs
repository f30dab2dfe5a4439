use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header;
use serde_json::{json, Value};
use tokio::time::sleep;

use crate::jobs::{dtos::job_input_dto::JobInputDto, enums::job_status::JobStatus};

use super::{
    envy::ClientEnvy,
    errors::ClientError,
    models::generated_image::GeneratedImage,
    structs::{
        run_response::RunResponse,
        status_response::{CompletedOutput, StatusResponse},
    },
};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub struct RunpodClient {
    http: reqwest::Client,
    endpoint_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl RunpodClient {
    pub fn new(endpoint_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint_url: endpoint_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }

    pub fn from_envy(envy: &ClientEnvy) -> Self {
        Self::new(&envy.endpoint_url(), &envy.runpod_api_key)
            .with_poll_interval(Duration::from_secs(envy.poll_interval_secs))
            .with_max_polls(envy.max_polls)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Submits a job and polls until it settles. Every failure is logged and
    /// collapsed to `None`.
    pub async fn submit_and_wait(&self, request: &JobInputDto) -> Option<GeneratedImage> {
        match self.try_submit_and_wait(request).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::error!(%e);
                None
            }
        }
    }

    pub async fn try_submit_and_wait(
        &self,
        request: &JobInputDto,
    ) -> Result<GeneratedImage, ClientError> {
        let started = Instant::now();

        tracing::info!("generating image for: {}", request.prompt);
        let id = self.submit(request).await?;
        tracing::info!("job submitted, id: {}", id);

        let mut polls: u32 = 0;

        loop {
            if let Some(max_polls) = self.max_polls {
                if polls >= max_polls {
                    return Err(ClientError::TimedOut { polls });
                }
            }

            sleep(self.poll_interval).await;

            let response = self.get_status(&id).await?;
            polls += 1;

            let status = response.status.unwrap_or_default();
            tracing::info!(
                "status: {} ({}s elapsed)",
                status,
                started.elapsed().as_secs()
            );

            match JobStatus::from_value(&status) {
                Some(JobStatus::InQueue) | Some(JobStatus::InProgress) => continue,
                Some(JobStatus::Completed) => {
                    let image = completed_image(response.output)?;
                    tracing::info!(
                        "generated {}x{} image in {:.2}s",
                        image.width,
                        image.height,
                        started.elapsed().as_secs_f64()
                    );
                    return Ok(image);
                }
                Some(JobStatus::Failed) => {
                    let reason = response.error.unwrap_or(status);
                    return Err(ClientError::JobFailed(reason));
                }
                None => return Err(ClientError::UnknownStatus(status)),
            }
        }
    }

    async fn submit(&self, request: &JobInputDto) -> Result<String, ClientError> {
        let url = format!("{}/run", self.endpoint_url);
        let payload = json!({ "input": request });

        let res = self
            .http
            .post(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClientError::SubmissionFailed(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ClientError::SubmissionFailed(format!("HTTP {}", res.status())));
        }

        let text = res
            .text()
            .await
            .map_err(|e| ClientError::SubmissionFailed(e.to_string()))?;

        let Ok(run_response) = serde_json::from_str::<RunResponse>(&text) else {
            return Err(ClientError::SubmissionFailed(format!("unreadable response: {}", text)));
        };

        match run_response.id {
            Some(id) if !id.is_empty() => {
                tracing::debug!("initial status: {}", run_response.status.unwrap_or_default());
                Ok(id)
            }
            _ => Err(ClientError::SubmissionFailed(format!("no job id in response: {}", text))),
        }
    }

    async fn get_status(&self, id: &str) -> Result<StatusResponse, ClientError> {
        let url = format!("{}/status/{}", self.endpoint_url, id);

        let text = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        serde_json::from_str(&text).map_err(|_| ClientError::MalformedResponse(text))
    }
}

fn completed_image(output: Option<Value>) -> Result<GeneratedImage, ClientError> {
    let Some(output) = output else {
        return Err(ClientError::MalformedResponse("completed without output".to_string()));
    };

    let Ok(completed) = serde_json::from_value::<CompletedOutput>(output.clone()) else {
        return Err(ClientError::MalformedResponse(output.to_string()));
    };

    match (completed.image, completed.error) {
        (Some(image), _) => decode_image(&image),
        (None, Some(error)) => Err(ClientError::Upstream(error)),
        (None, None) => Err(ClientError::MalformedResponse(output.to_string())),
    }
}

pub fn decode_image(image_base64: &str) -> Result<GeneratedImage, ClientError> {
    let bytes = base64::decode(image_base64).map_err(|e| ClientError::Decode(e.to_string()))?;

    let size = imagesize::blob_size(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;

    Ok(GeneratedImage {
        data: Bytes::from(bytes),
        width: size.width,
        height: size.height,
    })
}
