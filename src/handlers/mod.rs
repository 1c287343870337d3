pub mod health;
pub mod jobs;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Job endpoints
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/:id", get(jobs::get_job))
        .route("/jobs/run/:job_type", post(jobs::trigger_job))

        // Warehouse statistics
        .route("/stats", get(stats::get_stats))
}
