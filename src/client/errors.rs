use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("job failed: {0}")]
    JobFailed(String),
    #[error("error from endpoint: {0}")]
    Upstream(String),
    #[error("unknown status: {0:?}")]
    UnknownStatus(String),
    #[error("gave up after {polls} polls")]
    TimedOut { polls: u32 },
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
