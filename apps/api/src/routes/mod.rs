pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::optimization::handlers as optimization;
use crate::render::handlers as render;
use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job registry
        .route("/jobs", get(jobs::handle_list_jobs).post(jobs::handle_create_job))
        .route(
            "/jobs/:id",
            put(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
        .route("/jobs/:id/download", get(render::handle_download))
        // Optimization
        .route("/optimize/:id", post(optimization::handle_optimize))
}

/// Serves every route at the root and again under `/api`, the prefix the web client uses.
pub fn build_router(state: AppState) -> Router {
    let api = api_routes();
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
}
