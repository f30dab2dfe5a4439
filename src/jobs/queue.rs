use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use tokio::{
    sync::{mpsc, oneshot, RwLock},
    task::JoinHandle,
};

use crate::{
    app::{errors::DefaultApiError, models::api_error::ApiError},
    engine::{runner::CommandRunner, service::Engine},
};

use super::{
    enums::job_status::JobStatus,
    models::{job_counts::JobCounts, job_output::JobOutput, job_record::JobRecord},
    service,
};

pub struct QueuedJob {
    pub id: String,
    pub input: Value,
    pub notify: Option<oneshot::Sender<JobRecord>>,
}

/// In-memory queue behind the local API. Jobs are executed strictly one at a
/// time by the consumer task.
pub struct JobQueue {
    records: RwLock<HashMap<String, JobRecord>>,
    sender: mpsc::UnboundedSender<QueuedJob>,
}

impl JobQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QueuedJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let queue = Self {
            records: RwLock::new(HashMap::new()),
            sender,
        };

        (queue, receiver)
    }

    pub async fn submit(
        &self,
        input: Value,
        notify: Option<oneshot::Sender<JobRecord>>,
    ) -> Result<JobRecord, ApiError> {
        let record = JobRecord::new();
        let id = record.id.to_string();

        self.records.write().await.insert(id.to_string(), record.clone());

        let job = QueuedJob {
            id: id.to_string(),
            input,
            notify,
        };
        if self.sender.send(job).is_err() {
            tracing::error!("job consumer is gone, dropping job {}", id);
            self.records.write().await.remove(&id);
            return Err(DefaultApiError::InternalServerError.value());
        }

        tracing::debug!("queued job {}", id);
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Option<JobRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn counts(&self) -> JobCounts {
        let records = self.records.read().await;
        let mut counts = JobCounts::default();

        for record in records.values() {
            match record.status {
                JobStatus::InQueue => counts.in_queue += 1,
                JobStatus::InProgress => counts.in_progress += 1,
                JobStatus::Completed => counts.completed += 1,
                JobStatus::Failed => counts.failed += 1,
            }
        }

        counts
    }

    /// Drops finished jobs completed before `cutoff` (unix seconds).
    pub async fn purge_finished(&self, cutoff: u64) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();

        records.retain(|_, record| match (record.status.is_terminal(), record.completed_at) {
            (true, Some(completed_at)) => completed_at >= cutoff,
            _ => true,
        });

        before - records.len()
    }

    async fn mark_in_progress(&self, id: &str) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.status = JobStatus::InProgress;
        }
    }

    async fn finish(&self, id: &str, output: JobOutput) -> Option<JobRecord> {
        let mut records = self.records.write().await;
        let record = records.get_mut(id)?;
        record.complete(output);

        Some(record.clone())
    }
}

pub fn spawn_consumer<R: CommandRunner>(
    queue: Arc<JobQueue>,
    mut receiver: mpsc::UnboundedReceiver<QueuedJob>,
    engine: Arc<Engine<R>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = receiver.recv().await {
            tracing::info!("starting job {}", job.id);
            queue.mark_in_progress(&job.id).await;

            let output = service::handle(job.input, &engine).await;

            let Some(record) = queue.finish(&job.id, output).await else {
                tracing::warn!("job {} vanished before completion", job.id);
                continue;
            };

            tracing::info!("job {} finished: {}", record.id, record.status.value());

            if let Some(notify) = job.notify {
                if notify.send(record).is_err() {
                    tracing::debug!("waiter for job {} is gone", job.id);
                }
            }
        }

        tracing::debug!("job consumer stopped");
    })
}
