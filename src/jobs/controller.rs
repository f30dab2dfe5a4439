use std::sync::Arc;

use axum::{
    extract::{Path, State},
    headers::{authorization::Bearer, Authorization},
    Json, TypedHeader,
};
use axum_macros::debug_handler;
use tokio::sync::oneshot;

use crate::{
    app::{
        errors::DefaultApiError, models::api_error::ApiError,
        structs::json_from_request::JsonFromRequest,
    },
    AppState,
};

use super::{
    dtos::run_job_dto::RunJobDto,
    errors::JobsApiError,
    models::{job_counts::JobCounts, job_record::JobRecord},
};

type MaybeBearer = Option<TypedHeader<Authorization<Bearer>>>;

#[debug_handler]
pub async fn run(
    State(state): State<Arc<AppState>>,
    authorization: MaybeBearer,
    JsonFromRequest(dto): JsonFromRequest<RunJobDto>,
) -> Result<Json<JobRecord>, ApiError> {
    authorize(&state, authorization)?;

    let record = state.queue.submit(dto.input, None).await?;

    Ok(Json(record))
}

#[debug_handler]
pub async fn run_sync(
    State(state): State<Arc<AppState>>,
    authorization: MaybeBearer,
    JsonFromRequest(dto): JsonFromRequest<RunJobDto>,
) -> Result<Json<JobRecord>, ApiError> {
    authorize(&state, authorization)?;

    let (tx, rx) = oneshot::channel();
    let queued = state.queue.submit(dto.input, Some(tx)).await?;

    match rx.await {
        Ok(record) => Ok(Json(record)),
        Err(_) => {
            tracing::error!("job {} was dropped before completion", queued.id);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    authorization: MaybeBearer,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>, ApiError> {
    authorize(&state, authorization)?;

    match state.queue.get(&id).await {
        Some(record) => Ok(Json(record)),
        None => Err(JobsApiError::JobNotFound.value()),
    }
}

pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<JobCounts> {
    Json(state.queue.counts().await)
}

fn authorize(state: &AppState, authorization: MaybeBearer) -> Result<(), ApiError> {
    let Some(api_key) = &state.envy.api_key else {
        return Ok(());
    };

    match authorization {
        Some(TypedHeader(authorization)) if authorization.token() == api_key.as_str() => Ok(()),
        _ => Err(DefaultApiError::PermissionDenied.value()),
    }
}
