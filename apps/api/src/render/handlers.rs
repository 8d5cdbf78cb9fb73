//! Axum route handler for resume downloads.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::registry::parse_job_id;
use crate::render::{render_resume, ResumeVariant};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(rename = "type")]
    pub variant: Option<String>,
}

/// GET /jobs/:id/download?type=base|optimized
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let id = parse_job_id(&id)?;
    let variant: ResumeVariant = query
        .variant
        .as_deref()
        .unwrap_or_default()
        .parse()?;

    let rendered = render_resume(state.store.as_ref(), state.renderer.as_ref(), id, variant).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.file_name),
            ),
            (header::CONTENT_LENGTH, rendered.pdf.len().to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        rendered.pdf,
    )
        .into_response())
}
