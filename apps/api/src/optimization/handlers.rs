//! Axum route handler for resume optimization.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::jobs::registry::parse_job_id;
use crate::models::job_card::JobCard;
use crate::optimization::optimizer::optimize_job;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    pub optimized_resume: Option<String>,
    pub changes_summary: Option<String>,
    pub job: JobCard,
}

/// POST /optimize/:id
///
/// Blocks until the rewrite finishes. On failure the job is back in
/// Pending Optimization and the response carries the upstream detail.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let id = parse_job_id(&id)?;
    let job = optimize_job(
        state.store.as_ref(),
        state.rewriter.as_ref(),
        &state.optimize_locks,
        id,
    )
    .await?;

    Ok(Json(OptimizeResponse {
        success: true,
        optimized_resume: job.optimized_resume.clone(),
        changes_summary: job.changes_summary.clone(),
        job,
    }))
}
