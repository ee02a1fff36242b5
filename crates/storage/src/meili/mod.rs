//! Meilisearch backend.
//!
//! Writes are asynchronous on the Meilisearch side: every write returns a task
//! id immediately and indexing happens in the background. The live ingest path
//! only waits for that acknowledgment; provisioning and backfills wait for the
//! task to finish.

mod client;
mod settings;
mod store;

pub use client::{
    MeiliClient, Task, TaskError, TaskInfo, TaskStatus, DEFAULT_TASK_POLL_INTERVAL,
    DEFAULT_TASK_TIMEOUT,
};
pub use settings::IndexSettings;
pub use store::{MeiliConfig, MeiliStore};
