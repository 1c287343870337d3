use anyhow::Result;
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::db::{entities::job, enums::JobType, repositories::JobRepository};

/// Message sent to the job queue
#[derive(Debug, Clone)]
pub struct JobMessage {
    pub job_id: Uuid,
    pub job_type: JobType,
}

/// Job queue feeding the pipeline executor
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::UnboundedSender<JobMessage>,
    db: DatabaseConnection,
}

impl JobQueue {
    /// Create a new job queue and return (queue, receiver)
    pub fn new(db: DatabaseConnection) -> (Self, mpsc::UnboundedReceiver<JobMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender, db }, receiver)
    }

    /// Record a pending job and hand it to the executor
    pub async fn submit(&self, job_type: JobType) -> Result<job::Model> {
        let job = JobRepository::new(self.db.clone()).create(job_type).await?;

        let message = JobMessage {
            job_id: job.id,
            job_type,
        };
        self.sender
            .send(message)
            .map_err(|e| anyhow::anyhow!("Failed to submit job: {}", e))?;

        tracing::info!("Job {} ({}) submitted to queue", job.id, job_type.as_str());

        Ok(job)
    }
}
