use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::{
    db::{enums::JobType, repositories::JobRepository},
    jobs::queue::JobMessage,
    state::AppState,
    tasks::{run_extract, run_transform},
};

/// Background executor that runs queued pipeline jobs.
///
/// Jobs run one at a time in submission order, so two transforms never race
/// over the same pending objects.
pub struct JobExecutor {
    state: AppState,
    receiver: mpsc::UnboundedReceiver<JobMessage>,
}

impl JobExecutor {
    pub fn new(state: AppState, receiver: mpsc::UnboundedReceiver<JobMessage>) -> Self {
        Self { state, receiver }
    }

    /// Start the job executor loop
    pub async fn start(mut self) {
        tracing::info!("Job executor started");

        while let Some(message) = self.receiver.recv().await {
            if let Err(e) = Self::execute_job(&self.state, message).await {
                tracing::error!("Job bookkeeping failed: {:#}", e);
            }
        }

        tracing::warn!("Job executor stopped - queue closed");
    }

    /// Execute a single job, recording its outcome on the job row
    pub async fn execute_job(state: &AppState, message: JobMessage) -> Result<()> {
        let job_id = message.job_id;
        let jobs = JobRepository::new(state.db.clone());

        tracing::info!("Processing job {} ({})", job_id, message.job_type.as_str());
        if let Err(e) = jobs.mark_running(job_id).await {
            tracing::error!("Failed to update job status to running: {}", e);
        }

        match run_job(state, message.job_type).await {
            Ok(summary) => {
                tracing::info!("Job {} completed successfully: {}", job_id, summary);
                jobs.mark_completed(job_id, summary).await?;
            }
            Err(e) => {
                tracing::error!("Job {} failed: {:#}", job_id, e);
                jobs.mark_failed(job_id, format!("{:#}", e)).await?;
            }
        }

        Ok(())
    }
}

/// Run one pipeline stage against the shared state and describe the outcome.
pub async fn run_job(state: &AppState, job_type: JobType) -> Result<String> {
    match job_type {
        JobType::Extract => {
            let spotify = state.spotify()?;
            let key = run_extract(spotify, state.store.as_ref(), &state.config.playlist_link)
                .await
                .context("extract failed")?;
            Ok(format!("wrote {}", key))
        }
        JobType::Transform => {
            let report = run_transform(state.store.as_ref())
                .await
                .context("transform failed")?;
            Ok(serde_json::to_string(&report)?)
        }
        JobType::InitialLoad => {
            let report = state
                .loader()?
                .initial_load()
                .await
                .context("initial load failed")?;
            Ok(serde_json::to_string(&report)?)
        }
        JobType::Ingest => {
            let report = state
                .loader()?
                .ingest_new()
                .await
                .context("ingest failed")?;
            Ok(serde_json::to_string(&report)?)
        }
    }
}
