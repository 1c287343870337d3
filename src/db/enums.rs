use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Extract,
    Transform,
    InitialLoad,
    Ingest,
}

impl JobType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Extract => "extract",
            Self::Transform => "transform",
            Self::InitialLoad => "initial_load",
            Self::Ingest => "ingest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "extract" => Some(Self::Extract),
            "transform" => Some(Self::Transform),
            "initial_load" | "initial-load" => Some(Self::InitialLoad),
            "ingest" => Some(Self::Ingest),
            _ => None,
        }
    }
}

impl From<JobType> for String {
    fn from(job_type: JobType) -> String {
        job_type.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> String {
        status.as_str().to_string()
    }
}
