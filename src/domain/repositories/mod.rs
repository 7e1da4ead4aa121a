use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::{BroadcastJob, RecipientList};

/// Snapshot store for running and finished jobs.
///
/// Each job has exactly one writer (its runner task); readers get clones.
#[async_trait]
pub trait BroadcastJobRepository: Send + Sync {
    async fn save(&self, job: &BroadcastJob) -> anyhow::Result<()>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BroadcastJob>>;
    async fn list(&self) -> anyhow::Result<Vec<BroadcastJob>>;
}

#[async_trait]
pub trait RecipientListRepository: Send + Sync {
    async fn get(&self, id: &str) -> anyhow::Result<Option<RecipientList>>;
}
