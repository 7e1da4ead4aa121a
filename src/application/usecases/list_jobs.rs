use std::sync::Arc;

use crate::domain::models::BroadcastJob;
use crate::domain::repositories::BroadcastJobRepository;

pub struct ListJobsUseCase {
    jobs: Arc<dyn BroadcastJobRepository>,
}

impl ListJobsUseCase {
    pub fn new(jobs: Arc<dyn BroadcastJobRepository>) -> Self {
        Self { jobs }
    }

    pub async fn execute(&self) -> anyhow::Result<Vec<BroadcastJob>> {
        let mut jobs = self.jobs.list().await?;
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}
