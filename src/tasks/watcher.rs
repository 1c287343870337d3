use anyhow::Result;
use notify_debouncer_full::{
    new_debouncer, notify::*, DebounceEventResult, Debouncer, FileIdMap,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::db::enums::JobType;
use crate::jobs::JobQueue;

pub type WatcherHandle = Debouncer<RecommendedWatcher, FileIdMap>;

/// Watch `path` and submit `job_type` whenever objects appear or change.
///
/// Events are debounced for 5 seconds so a burst of writes yields one job.
/// The returned handle must be kept alive; dropping it stops the watcher.
pub fn start_watcher(
    path: PathBuf,
    queue: JobQueue,
    job_type: JobType,
) -> Result<WatcherHandle> {
    tracing::info!("Starting {} watcher for: {:?}", job_type.as_str(), path);
    std::fs::create_dir_all(&path)?;

    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut debouncer = new_debouncer(
        Duration::from_secs(5),
        None,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                let relevant = events
                    .iter()
                    .any(|event| event.kind.is_create() || event.kind.is_modify());
                if relevant {
                    if let Err(e) = tx.send(()) {
                        tracing::error!("Failed to forward filesystem event: {}", e);
                    }
                }
            }
            Err(errors) => {
                for error in errors {
                    tracing::error!("Filesystem watch error: {:?}", error);
                }
            }
        },
    )?;

    debouncer
        .watcher()
        .watch(&path, RecursiveMode::Recursive)?;

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            tracing::debug!("Changes detected in {:?}, submitting {}", path, job_type.as_str());
            if let Err(e) = queue.submit(job_type).await {
                tracing::error!("Failed to submit {} job: {}", job_type.as_str(), e);
            }
        }
    });

    tracing::info!("Filesystem watcher started successfully");
    Ok(debouncer)
}
