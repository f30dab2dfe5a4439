use serde::Serialize;
use uuid::Uuid;

use crate::{app::util::time::current_time_in_secs, jobs::enums::job_status::JobStatus};

use super::job_output::JobOutput;

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<JobOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: u64,
    #[serde(skip_serializing)]
    pub completed_at: Option<u64>,
}

impl JobRecord {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: JobStatus::InQueue,
            output: None,
            error: None,
            created_at: current_time_in_secs(),
            completed_at: None,
        }
    }

    /// Handler failures mark the job FAILED but keep the `{error}` output too.
    pub fn complete(&mut self, output: JobOutput) {
        self.status = match output.is_success() {
            true => JobStatus::Completed,
            false => JobStatus::Failed,
        };
        self.error = output.error().map(str::to_string);
        self.output = Some(output);
        self.completed_at = Some(current_time_in_secs());
    }
}
