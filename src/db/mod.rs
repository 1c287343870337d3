//! Warehouse tables, job bookkeeping and the queries over them.

pub mod entities;
pub mod enums;
pub mod repositories;

pub use entities::{Album, Artist, Job, LoadHistory, Song};
pub use enums::{JobStatus, JobType};
