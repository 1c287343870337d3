use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::db::entities::{album, artist, job, load_history, song};
use crate::db::enums::{JobStatus, JobType};
use crate::error::{AppError, Result};

pub struct JobRepository {
    db: DatabaseConnection,
}

impl JobRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a new pending job
    pub async fn create(&self, job_type: JobType) -> Result<job::Model> {
        let now = Utc::now().into();
        let job = job::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_type: Set(job_type.into()),
            status: Set(JobStatus::Pending.into()),
            summary: Set(None),
            error_message: Set(None),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(job.insert(&self.db).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<job::Model>> {
        Ok(job::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_recent(&self, limit: u64) -> Result<Vec<job::Model>> {
        Ok(job::Entity::find()
            .order_by_desc(job::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    pub async fn mark_running(&self, id: Uuid) -> Result<job::Model> {
        self.update_status(id, JobStatus::Running, None, None).await
    }

    pub async fn mark_completed(&self, id: Uuid, summary: String) -> Result<job::Model> {
        self.update_status(id, JobStatus::Completed, Some(summary), None)
            .await
    }

    pub async fn mark_failed(&self, id: Uuid, error_message: String) -> Result<job::Model> {
        self.update_status(id, JobStatus::Failed, None, Some(error_message))
            .await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        summary: Option<String>,
        error_message: Option<String>,
    ) -> Result<job::Model> {
        let job_record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job not found: {}", id)))?;

        let now = Utc::now();
        let mut active: job::ActiveModel = job_record.into();
        active.status = Set(status.into());
        active.updated_at = Set(now.into());

        if status == JobStatus::Running {
            active.started_at = Set(Some(now.into()));
        }
        if status.is_finished() {
            active.completed_at = Set(Some(now.into()));
        }
        if let Some(summary) = summary {
            active.summary = Set(Some(summary));
        }
        if let Some(msg) = error_message {
            active.error_message = Set(Some(msg));
        }

        Ok(active.update(&self.db).await?)
    }
}

/// Row counts of the warehouse tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WarehouseCounts {
    pub albums: u64,
    pub artists: u64,
    pub songs: u64,
    pub loaded_files: u64,
}

pub struct WarehouseRepository {
    db: DatabaseConnection,
}

impl WarehouseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn counts(&self) -> Result<WarehouseCounts> {
        Ok(WarehouseCounts {
            albums: album::Entity::find().count(&self.db).await?,
            artists: artist::Entity::find().count(&self.db).await?,
            songs: song::Entity::find().count(&self.db).await?,
            loaded_files: load_history::Entity::find().count(&self.db).await?,
        })
    }
}
