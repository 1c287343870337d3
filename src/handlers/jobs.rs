use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{entities::job, enums::JobType, repositories::JobRepository},
    error::{AppError, Result},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub job_type: String,
    pub status: String,
    pub summary: Option<String>,
    pub error_message: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
}

impl From<job::Model> for JobResponse {
    fn from(j: job::Model) -> Self {
        Self {
            id: j.id,
            job_type: j.job_type,
            status: j.status,
            summary: j.summary,
            error_message: j.error_message,
            started_at: j.started_at.map(|dt| dt.to_rfc3339()),
            completed_at: j.completed_at.map(|dt| dt.to_rfc3339()),
            created_at: j.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobCreatedResponse {
    pub job_id: Uuid,
    pub job_type: String,
    pub status: String,
}

pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobResponse>>> {
    let jobs = JobRepository::new(state.db.clone()).find_recent(50).await?;
    Ok(Json(jobs.into_iter().map(JobResponse::from).collect()))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>> {
    let job_record = JobRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(job_record.into()))
}

/// Queue one pipeline stage: `extract`, `transform`, `initial_load` or `ingest`
pub async fn trigger_job(
    State(state): State<AppState>,
    Path(job_type): Path<String>,
) -> Result<(StatusCode, Json<JobCreatedResponse>)> {
    let job_type = JobType::from_str(&job_type)
        .ok_or_else(|| AppError::NotFound(format!("Unknown job type: {}", job_type)))?;

    let job = state.job_queue.submit(job_type).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(JobCreatedResponse {
            job_id: job.id,
            job_type: job.job_type,
            status: job.status,
        }),
    ))
}
