use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::jobs::store::{JobStore, OptimizationRecord, StoreError};
use crate::models::job_card::{JobCard, JobCardPatch, JobStatus, NewJobCard};

/// In-process job store. Cards are kept in creation order.
#[derive(Default)]
pub struct MemoryJobStore {
    cards: RwLock<Vec<JobCard>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, id: Uuid, f: F) -> Option<JobCard>
    where
        F: FnOnce(&mut JobCard),
    {
        let mut cards = self.cards.write().await;
        let card = cards.iter_mut().find(|c| c.id == id)?;
        f(card);
        card.updated_at = Utc::now();
        Some(card.clone())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn list(&self) -> Result<Vec<JobCard>, StoreError> {
        Ok(self.cards.read().await.iter().rev().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<JobCard>, StoreError> {
        Ok(self.cards.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, card: NewJobCard) -> Result<JobCard, StoreError> {
        let now = Utc::now();
        let card = JobCard {
            id: Uuid::new_v4(),
            client_name: card.client_name,
            company_name: card.company_name,
            position: card.position,
            job_description: card.job_description,
            job_link: card.job_link,
            status: JobStatus::PendingOptimization,
            optimized_on: None,
            base_resume: card.base_resume,
            optimized_resume: None,
            changes_summary: None,
            created_at: now,
            updated_at: now,
        };
        self.cards.write().await.push(card.clone());
        Ok(card)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        patch: &JobCardPatch,
    ) -> Result<Option<JobCard>, StoreError> {
        Ok(self.modify(id, |card| patch.apply_to(card)).await)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: JobStatus,
    ) -> Result<Option<JobCard>, StoreError> {
        Ok(self.modify(id, |card| card.status = status).await)
    }

    async fn record_optimization(
        &self,
        id: Uuid,
        record: &OptimizationRecord,
    ) -> Result<Option<JobCard>, StoreError> {
        Ok(self
            .modify(id, |card| {
                card.status = JobStatus::Optimized;
                card.optimized_on = Some(record.optimized_on);
                card.optimized_resume = Some(record.optimized_resume.clone());
                card.changes_summary = Some(record.changes_summary.clone());
            })
            .await)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<JobCard>, StoreError> {
        let mut cards = self.cards.write().await;
        let index = cards.iter().position(|c| c.id == id);
        Ok(index.map(|i| cards.remove(i)))
    }

    async fn is_ready(&self) -> bool {
        true
    }
}
