use std::sync::Arc;

use crate::jobs::store::JobStore;
use crate::optimization::locks::RecordLocks;
use crate::optimization::optimizer::ResumeRewriter;
use crate::render::DocumentRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL store in production, memory store when no database is configured.
    pub store: Arc<dyn JobStore>,
    /// Resume rewriter. Default: `LlmClient`.
    pub rewriter: Arc<dyn ResumeRewriter>,
    /// HTML-to-PDF renderer. Default: `WkhtmltopdfRenderer`.
    pub renderer: Arc<dyn DocumentRenderer>,
    /// One lock per job card, held for the duration of an optimization.
    pub optimize_locks: Arc<RecordLocks>,
}
