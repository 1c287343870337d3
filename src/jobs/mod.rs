pub mod executor;
pub mod queue;

pub use executor::{run_job, JobExecutor};
pub use queue::{JobMessage, JobQueue};
