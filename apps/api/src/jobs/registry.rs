//! Job Registry: list, create, update and delete job cards.
//!
//! Validation runs before any write, so a rejected request never mutates the store.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::JobStore;
use crate::models::job_card::{JobCard, JobCardPatch, NewJobCard, DEFAULT_BASE_RESUME};

/// Request body for creating a job card. Every field is optional at the
/// serde level so missing fields surface as a validation error, not a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub client_name: Option<String>,
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub job_description: Option<String>,
    pub job_link: Option<String>,
    pub base_resume: Option<String>,
}

/// Parses a path id. Anything that is not a UUID cannot name a stored card.
pub fn parse_job_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| job_not_found(raw))
}

pub fn job_not_found(id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("Job {id} not found"))
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Checks the create body and turns it into a `NewJobCard`.
pub fn validate_create(request: CreateJobRequest) -> Result<NewJobCard, AppError> {
    let required = [
        ("clientName", &request.client_name),
        ("companyName", &request.company_name),
        ("position", &request.position),
        ("jobDescription", &request.job_description),
        ("jobLink", &request.job_link),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| !present(value))
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "All fields are required. Missing: {}",
            missing.join(", ")
        )));
    }

    let base_resume = request
        .base_resume
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_RESUME.to_string());

    Ok(NewJobCard {
        client_name: trimmed(request.client_name),
        company_name: trimmed(request.company_name),
        position: trimmed(request.position),
        job_description: request.job_description.unwrap_or_default(),
        job_link: trimmed(request.job_link),
        base_resume,
    })
}

/// Trims the fields the store keeps trimmed.
fn normalize_patch(mut patch: JobCardPatch) -> JobCardPatch {
    for field in [
        &mut patch.client_name,
        &mut patch.company_name,
        &mut patch.position,
        &mut patch.job_link,
    ] {
        if let Some(v) = field.as_mut() {
            *v = v.trim().to_string();
        }
    }
    patch
}

/// Validates a card after a patch has been merged into it.
fn validate_merged(card: &JobCard) -> Result<(), AppError> {
    let fields = [
        ("clientName", &card.client_name),
        ("companyName", &card.company_name),
        ("position", &card.position),
        ("jobDescription", &card.job_description),
        ("jobLink", &card.job_link),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{name} cannot be empty")));
        }
    }
    Ok(())
}

pub async fn list_jobs(store: &dyn JobStore) -> Result<Vec<JobCard>, AppError> {
    Ok(store.list().await?)
}

pub async fn create_job(
    store: &dyn JobStore,
    request: CreateJobRequest,
) -> Result<JobCard, AppError> {
    let new_card = validate_create(request)?;
    let card = store.insert(new_card).await?;
    info!(
        "Created job card {} ({} at {})",
        card.id, card.position, card.company_name
    );
    Ok(card)
}

pub async fn update_job(
    store: &dyn JobStore,
    id: Uuid,
    patch: JobCardPatch,
) -> Result<JobCard, AppError> {
    let patch = normalize_patch(patch);

    let mut merged = store.get(id).await?.ok_or_else(|| job_not_found(id))?;
    patch.apply_to(&mut merged);
    validate_merged(&merged)?;

    let card = store
        .update_fields(id, &patch)
        .await?
        .ok_or_else(|| job_not_found(id))?;
    info!("Updated job card {id}");
    Ok(card)
}

pub async fn delete_job(store: &dyn JobStore, id: Uuid) -> Result<JobCard, AppError> {
    let card = store.delete(id).await?.ok_or_else(|| job_not_found(id))?;
    info!("Deleted job card {id}");
    Ok(card)
}
