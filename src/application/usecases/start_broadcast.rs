use std::sync::Arc;

use uuid::Uuid;

use crate::application::handlers::broadcast_runner::BroadcastRunner;
use crate::domain::models::{BroadcastJob, MessageContent};
use crate::domain::repositories::RecipientListRepository;

pub struct StartBroadcastUseCase {
    lists: Arc<dyn RecipientListRepository>,
    runner: Arc<BroadcastRunner>,
}

pub struct StartBroadcastRequest {
    pub message: String,
    pub recipient_list_id: String,
    pub attachment: Option<String>,
}

#[derive(Debug)]
pub struct StartBroadcastResponse {
    pub job_id: Uuid,
}

impl StartBroadcastUseCase {
    pub fn new(lists: Arc<dyn RecipientListRepository>, runner: Arc<BroadcastRunner>) -> Self {
        Self { lists, runner }
    }

    /// Construct the job and hand it to its runner task. Returns as soon as
    /// the job is registered; the caller polls progress by job id.
    pub async fn execute(
        &self,
        request: StartBroadcastRequest,
    ) -> anyhow::Result<StartBroadcastResponse> {
        let list = self
            .lists
            .get(&request.recipient_list_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("recipient list not found"))?;

        if list.recipients.is_empty() {
            anyhow::bail!("recipient list is empty");
        }

        let content = MessageContent {
            body: request.message,
            attachment: request.attachment,
        };
        let job = BroadcastJob::new(content, list.recipients);
        let handle = self.runner.clone().spawn(job).await?;

        Ok(StartBroadcastResponse {
            job_id: handle.job_id,
        })
    }
}
