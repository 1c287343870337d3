use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::db::enums::JobType;
use crate::state::AppState;

pub mod extract;
pub mod transform;
pub mod watcher;

pub use extract::run_extract;
pub use transform::{run_transform, TransformReport};

/// Submit an extract job on the configured cron schedule.
pub async fn start_scheduler(state: AppState) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let queue = state.job_queue.clone();
    let extract_job = Job::new_async(state.config.extract_schedule.as_str(), move |_uuid, _lock| {
        let queue = queue.clone();
        Box::pin(async move {
            if let Err(e) = queue.submit(JobType::Extract).await {
                tracing::error!("Failed to submit scheduled extract: {}", e);
            }
        })
    })?;
    scheduler.add(extract_job).await?;
    tracing::info!("Extract scheduled with cron '{}'", state.config.extract_schedule);

    scheduler.start().await?;

    Ok(scheduler)
}

/// Watch the local raw and transformed prefixes. Raw arrivals trigger a
/// transform; transformed arrivals trigger an ingest when auto-ingest is on.
pub fn start_watchers(state: &AppState) -> Result<Vec<watcher::WatcherHandle>> {
    use crate::storage::layout;

    let root = &state.config.storage_root;
    let mut handles = vec![watcher::start_watcher(
        root.join(layout::RAW_PENDING_PREFIX),
        state.job_queue.clone(),
        JobType::Transform,
    )?];

    if state.config.auto_ingest {
        handles.push(watcher::start_watcher(
            root.join(layout::TRANSFORMED_PREFIX),
            state.job_queue.clone(),
            JobType::Ingest,
        )?);
    } else {
        tracing::info!("Auto-ingest disabled, transformed files load on request only");
    }

    Ok(handles)
}
