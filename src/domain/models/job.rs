use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::MessageContent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobStatus {
    Running,
    Completed,
    Aborted { reason: String },
}

/// One bulk-send invocation.
///
/// Mutated exclusively by the runner task that drives it; everyone else sees
/// cloned snapshots through the job repository. Nothing is persisted: a
/// process restart starts over from a fresh job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastJob {
    pub id: Uuid,
    pub content: MessageContent,
    /// Raw identifiers exactly as loaded; normalized one at a time.
    pub recipients: Vec<String>,
    /// Index of the next recipient to process.
    pub cursor: usize,
    /// Successful sends within the current day window.
    pub sent_today: u32,
    pub sent: u32,
    pub failed: u32,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BroadcastJob {
    pub fn new(content: MessageContent, recipients: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            recipients,
            cursor: 0,
            sent_today: 0,
            sent: 0,
            failed: 0,
            status: JobStatus::Running,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn current_recipient(&self) -> Option<&str> {
        self.recipients.get(self.cursor).map(String::as_str)
    }

    pub fn record_success(&mut self) {
        self.sent += 1;
        self.sent_today += 1;
        self.cursor += 1;
        self.touch();
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.cursor += 1;
        self.touch();
    }

    pub fn reset_daily_counter(&mut self) {
        self.sent_today = 0;
        self.touch();
    }

    pub fn complete(&mut self) {
        self.status = JobStatus::Completed;
        self.touch();
    }

    pub fn abort(&mut self, reason: impl Into<String>) {
        self.status = JobStatus::Aborted {
            reason: reason.into(),
        };
        self.touch();
    }

    pub fn summary(&self) -> BroadcastSummary {
        BroadcastSummary {
            total: self.recipients.len(),
            sent: self.sent,
            failed: self.failed,
            body: self.content.body.clone(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Final tally of a finished broadcast, preserved verbatim in the log and in
/// the operator notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastSummary {
    pub total: usize,
    pub sent: u32,
    pub failed: u32,
    pub body: String,
}

impl BroadcastSummary {
    pub fn to_message(&self) -> String {
        format!(
            "Broadcast finished: {} sent, {} failed out of {} recipients. Message: {}",
            self.sent, self.failed, self.total, self.body
        )
    }
}
