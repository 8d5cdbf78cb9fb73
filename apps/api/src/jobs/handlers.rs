//! Axum route handlers for the Job Registry.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::jobs::registry::{
    create_job, delete_job, list_jobs, parse_job_id, update_job, CreateJobRequest,
};
use crate::models::job_card::{JobCard, JobCardPatch};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteJobResponse {
    pub message: String,
    pub deleted_job: JobCard,
}

/// GET /jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobCard>>, AppError> {
    Ok(Json(list_jobs(state.store.as_ref()).await?))
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobCard>), AppError> {
    let Json(request) = body?;
    let card = create_job(state.store.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<JobCardPatch>, JsonRejection>,
) -> Result<Json<JobCard>, AppError> {
    let id = parse_job_id(&id)?;
    let Json(patch) = body?;
    Ok(Json(update_job(state.store.as_ref(), id, patch).await?))
}

/// DELETE /jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteJobResponse>, AppError> {
    let id = parse_job_id(&id)?;
    let deleted_job = delete_job(state.store.as_ref(), id).await?;
    state.optimize_locks.release(id);

    Ok(Json(DeleteJobResponse {
        message: "Job deleted successfully".to_string(),
        deleted_job,
    }))
}
