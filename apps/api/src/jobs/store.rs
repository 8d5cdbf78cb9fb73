//! Job card persistence.
//!
//! `JobStore` is the seam between the services and the document store.
//! `PgJobStore` is the production backend; `MemoryJobStore` (see `memory.rs`)
//! serves local runs without a database and the test suite.
//!
//! Every write is a single statement, so each one is atomic per record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::db::Database;
use crate::models::job_card::{JobCard, JobCardPatch, JobCardRow, JobStatus, NewJobCard};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored record is invalid: {0}")]
    Corrupt(String),
}

/// Result fields written by a successful optimization.
#[derive(Debug, Clone)]
pub struct OptimizationRecord {
    pub optimized_resume: String,
    pub changes_summary: String,
    pub optimized_on: DateTime<Utc>,
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// All job cards, newest created first.
    async fn list(&self) -> Result<Vec<JobCard>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<JobCard>, StoreError>;

    async fn insert(&self, card: NewJobCard) -> Result<JobCard, StoreError>;

    /// Applies the present fields of `patch`. `None` when the id is unknown.
    async fn update_fields(
        &self,
        id: Uuid,
        patch: &JobCardPatch,
    ) -> Result<Option<JobCard>, StoreError>;

    async fn set_status(&self, id: Uuid, status: JobStatus)
        -> Result<Option<JobCard>, StoreError>;

    /// Marks the card Optimized and stores the rewrite in the same write.
    async fn record_optimization(
        &self,
        id: Uuid,
        record: &OptimizationRecord,
    ) -> Result<Option<JobCard>, StoreError>;

    /// Removes the card, returning the deleted snapshot.
    async fn delete(&self, id: Uuid) -> Result<Option<JobCard>, StoreError>;

    async fn is_ready(&self) -> bool;
}

fn into_card(row: JobCardRow) -> Result<JobCard, StoreError> {
    JobCard::try_from(row).map_err(StoreError::Corrupt)
}

fn into_card_opt(row: Option<JobCardRow>) -> Result<Option<JobCard>, StoreError> {
    row.map(into_card).transpose()
}

/// PostgreSQL-backed job store over the `job_cards` table.
pub struct PgJobStore {
    db: Database,
}

impl PgJobStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn list(&self) -> Result<Vec<JobCard>, StoreError> {
        let rows = sqlx::query_as::<_, JobCardRow>(
            "SELECT * FROM job_cards ORDER BY created_at DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(into_card).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<JobCard>, StoreError> {
        let row = sqlx::query_as::<_, JobCardRow>("SELECT * FROM job_cards WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        into_card_opt(row)
    }

    async fn insert(&self, card: NewJobCard) -> Result<JobCard, StoreError> {
        let row = sqlx::query_as::<_, JobCardRow>(
            r#"
            INSERT INTO job_cards
                (id, client_name, company_name, position, job_description, job_link,
                 status, base_resume)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&card.client_name)
        .bind(&card.company_name)
        .bind(&card.position)
        .bind(&card.job_description)
        .bind(&card.job_link)
        .bind(JobStatus::PendingOptimization.as_str())
        .bind(&card.base_resume)
        .fetch_one(self.db.pool())
        .await?;

        into_card(row)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        patch: &JobCardPatch,
    ) -> Result<Option<JobCard>, StoreError> {
        let row = sqlx::query_as::<_, JobCardRow>(
            r#"
            UPDATE job_cards SET
                client_name     = COALESCE($2, client_name),
                company_name    = COALESCE($3, company_name),
                position        = COALESCE($4, position),
                job_description = COALESCE($5, job_description),
                job_link        = COALESCE($6, job_link),
                base_resume     = COALESCE($7, base_resume),
                updated_at      = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.client_name.as_deref())
        .bind(patch.company_name.as_deref())
        .bind(patch.position.as_deref())
        .bind(patch.job_description.as_deref())
        .bind(patch.job_link.as_deref())
        .bind(patch.base_resume.as_deref())
        .fetch_optional(self.db.pool())
        .await?;

        into_card_opt(row)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: JobStatus,
    ) -> Result<Option<JobCard>, StoreError> {
        let row = sqlx::query_as::<_, JobCardRow>(
            "UPDATE job_cards SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.db.pool())
        .await?;

        into_card_opt(row)
    }

    async fn record_optimization(
        &self,
        id: Uuid,
        record: &OptimizationRecord,
    ) -> Result<Option<JobCard>, StoreError> {
        let row = sqlx::query_as::<_, JobCardRow>(
            r#"
            UPDATE job_cards SET
                status           = $2,
                optimized_on     = $3,
                optimized_resume = $4,
                changes_summary  = $5,
                updated_at       = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(JobStatus::Optimized.as_str())
        .bind(record.optimized_on)
        .bind(&record.optimized_resume)
        .bind(&record.changes_summary)
        .fetch_optional(self.db.pool())
        .await?;

        into_card_opt(row)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<JobCard>, StoreError> {
        let row = sqlx::query_as::<_, JobCardRow>("DELETE FROM job_cards WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        into_card_opt(row)
    }

    async fn is_ready(&self) -> bool {
        self.db.is_ready().await
    }
}
