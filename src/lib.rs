use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{app::envy::Envy, jobs::queue::JobQueue};

pub mod app;
pub mod client;
pub mod engine;
pub mod jobs;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct AppState {
    pub queue: Arc<JobQueue>,
    pub envy: Arc<Envy>,
}

/// Local stand-in for the queue platform's `/run` + `/status` contract.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(jobs::controller::get_health))
        .route("/run", post(jobs::controller::run))
        .route("/runsync", post(jobs::controller::run_sync))
        .route("/status/:id", get(jobs::controller::get_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
