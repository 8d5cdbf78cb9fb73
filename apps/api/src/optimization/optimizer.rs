//! Resume optimization: one rewrite call per request, tracked through the
//! job card's status field.
//!
//! Flow: lock record → fetch → mark Optimizing → rewrite → summarize →
//!       persist Optimized. Any failure after the status change writes
//!       Pending Optimization back once and returns the original error.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::registry::job_not_found;
use crate::jobs::store::{JobStore, OptimizationRecord};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::job_card::{JobCard, JobStatus};
use crate::optimization::locks::RecordLocks;
use crate::optimization::prompts::build_rewrite_prompt;
use crate::optimization::summary::summarize_changes;

/// Rewrites a resume against a job description.
///
/// Carried in `AppState` as `Arc<dyn ResumeRewriter>`; `LlmClient` is the
/// production implementation.
#[async_trait]
pub trait ResumeRewriter: Send + Sync {
    async fn rewrite(&self, job_description: &str, base_resume: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl ResumeRewriter for LlmClient {
    async fn rewrite(&self, job_description: &str, base_resume: &str) -> Result<String, LlmError> {
        let prompt = build_rewrite_prompt(job_description, base_resume);
        self.call_text(&prompt).await
    }
}

/// Runs one optimization of job card `id` and returns the updated card.
pub async fn optimize_job(
    store: &dyn JobStore,
    rewriter: &dyn ResumeRewriter,
    locks: &RecordLocks,
    id: Uuid,
) -> Result<JobCard, AppError> {
    let _guard = locks.acquire(id).await;

    let job = store.get(id).await?.ok_or_else(|| job_not_found(id))?;

    store
        .set_status(id, JobStatus::Optimizing)
        .await?
        .ok_or_else(|| job_not_found(id))?;
    info!("Optimizing resume for job {id} ({})", job.company_name);

    match rewrite_and_record(store, rewriter, &job).await {
        Ok(updated) => {
            info!("Job {id} optimized");
            Ok(updated)
        }
        Err(e) => {
            warn!("Optimization of job {id} failed: {e}");
            revert_status(store, id).await;
            Err(e)
        }
    }
}

async fn rewrite_and_record(
    store: &dyn JobStore,
    rewriter: &dyn ResumeRewriter,
    job: &JobCard,
) -> Result<JobCard, AppError> {
    let optimized_resume = rewriter
        .rewrite(&job.job_description, &job.base_resume)
        .await?;

    let record = OptimizationRecord {
        changes_summary: summarize_changes(&job.base_resume, &optimized_resume),
        optimized_resume,
        optimized_on: Utc::now(),
    };

    store
        .record_optimization(job.id, &record)
        .await?
        .ok_or_else(|| job_not_found(job.id))
}

/// Compensating write after a failed optimization. Result fields from an
/// earlier successful run stay in place.
async fn revert_status(store: &dyn JobStore, id: Uuid) {
    match store.set_status(id, JobStatus::PendingOptimization).await {
        Ok(Some(_)) => info!("Job {id} reverted to {}", JobStatus::PendingOptimization),
        Ok(None) => warn!("Job {id} disappeared before its status could be reverted"),
        Err(e) => error!("Failed to revert status of job {id}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::jobs::memory::MemoryJobStore;
    use crate::models::job_card::NewJobCard;

    const BASE: &str = "Jane Doe\nSoftware Engineer\n- Built services in Go";

    struct StubRewriter(String);

    #[async_trait]
    impl ResumeRewriter for StubRewriter {
        async fn rewrite(&self, _jd: &str, _base: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct FailingRewriter;

    #[async_trait]
    impl ResumeRewriter for FailingRewriter {
        async fn rewrite(&self, _jd: &str, _base: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "upstream unavailable".into(),
            })
        }
    }

    /// Records the status of the only stored card while the rewrite runs.
    struct StatusProbe {
        store: Arc<MemoryJobStore>,
        seen: Mutex<Option<JobStatus>>,
    }

    #[async_trait]
    impl ResumeRewriter for StatusProbe {
        async fn rewrite(&self, _jd: &str, base: &str) -> Result<String, LlmError> {
            let cards = self.store.list().await.unwrap();
            *self.seen.lock().unwrap() = cards.first().map(|c| c.status);
            Ok(format!("{base}\n- Rust"))
        }
    }

    /// Tracks how many rewrites run at the same time.
    #[derive(Default)]
    struct ConcurrencyProbe {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ResumeRewriter for ConcurrencyProbe {
        async fn rewrite(&self, _jd: &str, base: &str) -> Result<String, LlmError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(base.to_uppercase())
        }
    }

    async fn seeded_store() -> (Arc<MemoryJobStore>, Uuid) {
        let store = Arc::new(MemoryJobStore::new());
        let card = store
            .insert(NewJobCard {
                client_name: "Alice".into(),
                company_name: "Acme".into(),
                position: "Engineer".into(),
                job_description: "Rust, PostgreSQL, distributed systems".into(),
                job_link: "https://acme.example/job/1".into(),
                base_resume: BASE.into(),
            })
            .await
            .unwrap();
        (store, card.id)
    }

    #[tokio::test]
    async fn test_successful_optimization_sets_result_fields() {
        let (store, id) = seeded_store().await;
        let rewritten = format!("{BASE}\n{}", "- Shipped Rust services on PostgreSQL. ".repeat(3));
        let rewriter = StubRewriter(rewritten.clone());

        let job = optimize_job(store.as_ref(), &rewriter, &RecordLocks::new(), id)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Optimized);
        assert!(job.optimized_on.is_some());
        assert_eq!(job.optimized_resume.as_deref(), Some(rewritten.as_str()));
        let summary = job.changes_summary.unwrap();
        assert!(summary.contains("enhanced keywords for ATS compatibility"));
        assert!(summary.contains("expanded content with relevant details"));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_and_mutates_nothing() {
        let (store, id) = seeded_store().await;
        let before = store.get(id).await.unwrap().unwrap();

        let result = optimize_job(
            store.as_ref(),
            &StubRewriter("x".into()),
            &RecordLocks::new(),
            Uuid::new_v4(),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.get(id).await.unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_ids_leave_no_lock_slots() {
        let store = MemoryJobStore::new();
        let locks = RecordLocks::new();

        for _ in 0..1000 {
            let result =
                optimize_job(&store, &StubRewriter("x".into()), &locks, Uuid::new_v4()).await;
            assert!(matches!(result, Err(AppError::NotFound(_))));
        }

        assert_eq!(locks.slot_count(), 0);
    }

    #[tokio::test]
    async fn test_finished_optimizations_leave_no_lock_slots() {
        let (store, id) = seeded_store().await;
        let locks = RecordLocks::new();

        optimize_job(store.as_ref(), &StubRewriter("done".into()), &locks, id)
            .await
            .unwrap();
        optimize_job(store.as_ref(), &FailingRewriter, &locks, id)
            .await
            .unwrap_err();

        assert_eq!(locks.slot_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_reverts_status_and_surfaces_detail() {
        let (store, id) = seeded_store().await;

        let err = optimize_job(store.as_ref(), &FailingRewriter, &RecordLocks::new(), id)
            .await
            .unwrap_err();

        match err {
            AppError::ExternalService { context, detail } => {
                assert_eq!(context, "Failed to optimize resume");
                assert!(detail.contains("upstream unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let job = store.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::PendingOptimization);
        assert!(job.optimized_resume.is_none());
    }

    #[tokio::test]
    async fn test_failure_after_success_keeps_stale_results() {
        let (store, id) = seeded_store().await;
        let locks = RecordLocks::new();
        optimize_job(store.as_ref(), &StubRewriter("first".into()), &locks, id)
            .await
            .unwrap();

        optimize_job(store.as_ref(), &FailingRewriter, &locks, id)
            .await
            .unwrap_err();

        let job = store.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::PendingOptimization);
        assert_eq!(job.optimized_resume.as_deref(), Some("first"));
        assert!(job.changes_summary.is_some());
    }

    #[tokio::test]
    async fn test_failure_reverts_even_from_stuck_optimizing() {
        let (store, id) = seeded_store().await;
        store.set_status(id, JobStatus::Optimizing).await.unwrap();

        optimize_job(store.as_ref(), &FailingRewriter, &RecordLocks::new(), id)
            .await
            .unwrap_err();

        let job = store.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::PendingOptimization);
    }

    #[tokio::test]
    async fn test_status_is_optimizing_during_rewrite() {
        let (store, id) = seeded_store().await;
        let probe = StatusProbe {
            store: store.clone(),
            seen: Mutex::new(None),
        };

        optimize_job(store.as_ref(), &probe, &RecordLocks::new(), id)
            .await
            .unwrap();

        assert_eq!(*probe.seen.lock().unwrap(), Some(JobStatus::Optimizing));
    }

    #[tokio::test]
    async fn test_concurrent_calls_on_same_id_are_serialized() {
        let (store, id) = seeded_store().await;
        let locks = RecordLocks::new();
        let probe = ConcurrencyProbe::default();

        let (a, b) = tokio::join!(
            optimize_job(store.as_ref(), &probe, &locks, id),
            optimize_job(store.as_ref(), &probe, &locks, id),
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(probe.peak.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.get(id).await.unwrap().unwrap().status,
            JobStatus::Optimized
        );
    }

    #[tokio::test]
    async fn test_different_ids_run_concurrently() {
        let (store, first) = seeded_store().await;
        let second = store
            .insert(NewJobCard {
                client_name: "Bob".into(),
                company_name: "Globex".into(),
                position: "SRE".into(),
                job_description: "Kubernetes".into(),
                job_link: "https://globex.example/jobs/7".into(),
                base_resume: BASE.into(),
            })
            .await
            .unwrap()
            .id;
        let locks = RecordLocks::new();
        let probe = ConcurrencyProbe::default();

        let (a, b) = tokio::join!(
            optimize_job(store.as_ref(), &probe, &locks, first),
            optimize_job(store.as_ref(), &probe, &locks, second),
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(probe.peak.load(Ordering::SeqCst), 2);
    }
}
