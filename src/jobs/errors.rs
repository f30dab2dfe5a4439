use axum::http::StatusCode;
use thiserror::Error;

use crate::{app::models::api_error::ApiError, engine::errors::GenerationError};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] serde_json::Error),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed job: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug)]
pub enum JobsApiError {
    JobNotFound,
}

impl JobsApiError {
    pub fn value(&self) -> ApiError {
        match *self {
            Self::JobNotFound => ApiError {
                code: StatusCode::NOT_FOUND,
                message: "Job not found.".to_string(),
            },
        }
    }
}
