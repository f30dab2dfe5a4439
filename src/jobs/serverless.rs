use std::{sync::Arc, time::Duration};

use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, sleep},
};
use tokio_retry::{strategy::FixedInterval, Retry};

use crate::{
    app::envy::Envy,
    engine::{runner::CommandRunner, service::Engine},
};

use super::{
    errors::WebhookError,
    models::{job::Job, job_output::JobOutput},
    service,
};

const ID_PLACEHOLDER: &str = "$ID";
const POD_ID_PLACEHOLDER: &str = "$RUNPOD_POD_ID";

/// Job-take, result and heartbeat webhooks injected by the platform into the
/// worker's environment.
#[derive(Debug, Clone)]
pub struct Webhooks {
    pub get_job: String,
    pub post_output: String,
    pub ping: Option<String>,
    pub api_key: String,
    pub pod_id: String,
    pub idle_wait: Duration,
    pub error_wait: Duration,
    pub ping_interval: Duration,
    pub post_retry_interval: Duration,
    pub post_retries: usize,
}

impl Webhooks {
    pub fn from_envy(envy: &Envy) -> Option<Self> {
        Some(Self {
            get_job: envy.runpod_webhook_get_job.clone()?,
            post_output: envy.runpod_webhook_post_output.clone()?,
            ping: envy.runpod_webhook_ping.clone(),
            api_key: envy.runpod_ai_api_key.clone().unwrap_or_default(),
            pod_id: envy.runpod_pod_id.clone().unwrap_or_default(),
            idle_wait: Duration::from_secs(1),
            error_wait: Duration::from_secs(5),
            ping_interval: Duration::from_millis(envy.runpod_ping_interval),
            post_retry_interval: Duration::from_secs(10),
            post_retries: 3,
        })
    }

    fn take_url(&self) -> String {
        self.get_job.replace(ID_PLACEHOLDER, &self.pod_id)
    }

    fn output_url(&self, job_id: &str) -> String {
        self.post_output.replace(ID_PLACEHOLDER, job_id)
    }

    fn ping_url(&self) -> Option<String> {
        let ping = self.ping.as_ref()?;
        Some(ping.replace(POD_ID_PLACEHOLDER, &self.pod_id))
    }
}

/// Pulls jobs forever, one at a time.
pub async fn start<R: CommandRunner>(webhooks: Webhooks, engine: Arc<Engine<R>>) {
    let client = reqwest::Client::new();
    tracing::info!("serverless worker started on pod {}", webhooks.pod_id);

    let (current_job, current_job_rx) = watch::channel(None);
    match spawn_heartbeat(client.clone(), &webhooks, current_job_rx) {
        Some(_) => tracing::debug!("heartbeat every {:?}", webhooks.ping_interval),
        None => tracing::warn!("RUNPOD_WEBHOOK_PING is not set, no heartbeat will be sent"),
    }

    loop {
        let job = match take_job(&client, &webhooks).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                sleep(webhooks.idle_wait).await;
                continue;
            }
            Err(e) => {
                tracing::error!("failed to take job: {}", e);
                sleep(webhooks.error_wait).await;
                continue;
            }
        };

        tracing::info!("received job {}", job.id);
        current_job.send_replace(Some(job.id.to_string()));

        let output = service::handle(job.input, &engine).await;

        if let Err(e) = post_output_with_retry(&client, &webhooks, &job.id, &output).await {
            tracing::error!("failed to report result of job {}: {}", job.id, e);
        }

        current_job.send_replace(None);
    }
}

pub async fn take_job(
    client: &reqwest::Client,
    webhooks: &Webhooks,
) -> Result<Option<Job>, WebhookError> {
    let res = client
        .get(webhooks.take_url())
        .header(header::AUTHORIZATION, &webhooks.api_key)
        .send()
        .await?;

    if res.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !res.status().is_success() {
        return Err(WebhookError::Status(res.status()));
    }

    let text = res.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(&text)?))
}

/// Tells the platform the worker is alive, naming the job in progress.
fn spawn_heartbeat(
    client: reqwest::Client,
    webhooks: &Webhooks,
    current_job: watch::Receiver<Option<String>>,
) -> Option<JoinHandle<()>> {
    let url = webhooks.ping_url()?;
    let api_key = webhooks.api_key.to_string();
    // interval() rejects a zero period.
    let period = webhooks.ping_interval.max(Duration::from_millis(1));

    Some(tokio::spawn(async move {
        let mut interval = interval(period);

        loop {
            interval.tick().await;
            let job_id = current_job.borrow().clone();

            if let Err(e) = ping(&client, &url, &api_key, job_id.as_deref()).await {
                tracing::warn!("heartbeat failed: {}", e);
            }
        }
    }))
}

async fn ping(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    job_id: Option<&str>,
) -> Result<(), WebhookError> {
    let mut req = client.get(url).header(header::AUTHORIZATION, api_key);
    if let Some(job_id) = job_id {
        req = req.query(&[("job_id", job_id)]);
    }

    let res = req.send().await?;

    match res.status().is_success() {
        true => Ok(()),
        false => Err(WebhookError::Status(res.status())),
    }
}

async fn post_output_with_retry(
    client: &reqwest::Client,
    webhooks: &Webhooks,
    job_id: &str,
    output: &JobOutput,
) -> Result<(), WebhookError> {
    let retry_strategy =
        FixedInterval::new(webhooks.post_retry_interval).take(webhooks.post_retries);

    Retry::spawn(retry_strategy, || async {
        post_output(client, webhooks, job_id, output).await
    })
    .await
}

async fn post_output(
    client: &reqwest::Client,
    webhooks: &Webhooks,
    job_id: &str,
    output: &JobOutput,
) -> Result<(), WebhookError> {
    let res = client
        .post(webhooks.output_url(job_id))
        .query(&[("isStream", "false")])
        .header(header::AUTHORIZATION, &webhooks.api_key)
        .json(&output_body(output))
        .send()
        .await?;

    match res.status().is_success() {
        true => Ok(()),
        false => {
            tracing::warn!("post_output for {}: {}", job_id, res.status());
            Err(WebhookError::Status(res.status()))
        }
    }
}

fn output_body(output: &JobOutput) -> Value {
    match output {
        JobOutput::Success(result) => json!({ "output": result }),
        JobOutput::Failure { error } => json!({ "error": error }),
    }
}
