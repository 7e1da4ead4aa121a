use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::models::{BroadcastJob, RecipientList};
use crate::domain::repositories::{BroadcastJobRepository, RecipientListRepository};

#[derive(Default)]
pub struct InMemoryBroadcastJobRepository {
    jobs: Arc<RwLock<HashMap<Uuid, BroadcastJob>>>,
}

impl InMemoryBroadcastJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BroadcastJobRepository for InMemoryBroadcastJobRepository {
    async fn save(&self, job: &BroadcastJob) -> anyhow::Result<()> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BroadcastJob>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<BroadcastJob>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryRecipientListRepository {
    lists: Arc<RwLock<HashMap<String, RecipientList>>>,
}

impl InMemoryRecipientListRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, list: RecipientList) {
        let mut lists = self.lists.write().await;
        lists.insert(list.id.clone(), list);
    }
}

#[async_trait]
impl RecipientListRepository for InMemoryRecipientListRepository {
    async fn get(&self, id: &str) -> anyhow::Result<Option<RecipientList>> {
        let lists = self.lists.read().await;
        Ok(lists.get(id).cloned())
    }
}
