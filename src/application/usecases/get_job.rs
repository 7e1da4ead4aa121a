use std::sync::Arc;

use uuid::Uuid;

use crate::domain::models::BroadcastJob;
use crate::domain::repositories::BroadcastJobRepository;

pub struct GetJobUseCase {
    jobs: Arc<dyn BroadcastJobRepository>,
}

impl GetJobUseCase {
    pub fn new(jobs: Arc<dyn BroadcastJobRepository>) -> Self {
        Self { jobs }
    }

    pub async fn execute(&self, job_id: Uuid) -> anyhow::Result<Option<BroadcastJob>> {
        self.jobs.get(job_id).await
    }
}
