//! Staged ingestion of transformed CSV files into the warehouse tables.
//!
//! Each record kind has a [`CopyPipe`]: a path pattern over the transformed
//! store and a destination table. The [`Loader`] drives the pipes, tracking
//! every loaded file in `load_history` so a file is never ingested twice.

mod loader;
mod pipe;

pub use loader::{LoadReport, Loader};
pub use pipe::{default_pipes, CopyPipe};
