use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::services::pacing::{Pacer, Quota};
use crate::application::services::safe_send::SafeSender;
use crate::domain::errors::DeliveryError;
use crate::domain::models::{BroadcastJob, MessageContent};
use crate::domain::repositories::BroadcastJobRepository;
use crate::domain::value_objects::{Jid, RecipientDefaults};

/// Returned to the caller that started a broadcast. The job keeps running on
/// its own task whether or not the handle is kept.
pub struct BroadcastHandle {
    pub job_id: Uuid,
    pub task: JoinHandle<()>,
}

/// Drives one broadcast job to completion: window and quota gates, recipient
/// normalization, the delivery itself and the tally bookkeeping.
///
/// One runner task per job; all jobs share the serialized transport
/// underneath [`SafeSender`].
pub struct BroadcastRunner {
    sender: Arc<SafeSender>,
    pacer: Pacer,
    jobs: Arc<dyn BroadcastJobRepository>,
    defaults: RecipientDefaults,
    /// Canonical identifier that receives the completion summary, if any.
    operator: Option<Jid>,
}

impl BroadcastRunner {
    pub fn new(
        sender: Arc<SafeSender>,
        pacer: Pacer,
        jobs: Arc<dyn BroadcastJobRepository>,
        defaults: RecipientDefaults,
        operator: Option<Jid>,
    ) -> Self {
        Self {
            sender,
            pacer,
            jobs,
            defaults,
            operator,
        }
    }

    /// Store the fresh job and start driving it on its own task.
    pub async fn spawn(self: Arc<Self>, job: BroadcastJob) -> anyhow::Result<BroadcastHandle> {
        self.jobs.save(&job).await?;
        let job_id = job.id;
        let task = tokio::spawn(async move { self.run(job).await });
        Ok(BroadcastHandle { job_id, task })
    }

    pub async fn run(&self, mut job: BroadcastJob) {
        info!(
            job_id = %job.id,
            recipients = job.recipients.len(),
            "broadcast started"
        );

        while let Some(raw) = job.current_recipient().map(str::to_owned) {
            // Both gates run before every attempt; a job can outlive the
            // window it started in.
            self.pacer.await_window().await;

            if self.pacer.check_quota(job.sent_today) == Quota::Exhausted {
                warn!(
                    job_id = %job.id,
                    sent_today = job.sent_today,
                    "daily quota exhausted, cooling down"
                );
                job.reset_daily_counter();
                self.persist(&job).await;
                sleep(self.pacer.quota_cooldown()).await;
                continue;
            }

            let target = match Jid::normalize(&raw, &self.defaults) {
                Ok(target) => target,
                Err(reason) => {
                    warn!(job_id = %job.id, recipient = %raw, %reason, "recipient rejected");
                    job.record_failure();
                    self.persist(&job).await;
                    sleep(self.pacer.failure_delay()).await;
                    continue;
                }
            };

            match self.sender.send(&target, &job.content).await {
                Ok(()) => {
                    job.record_success();
                    self.persist(&job).await;
                    sleep(self.pacer.next_delay()).await;
                }
                Err(err @ DeliveryError::SessionDown { .. }) => {
                    // Carrying on would fail every remaining recipient.
                    error!(
                        job_id = %job.id,
                        cursor = job.cursor,
                        error = %err,
                        "transport session down, aborting broadcast"
                    );
                    job.abort(err.to_string());
                    self.persist(&job).await;
                    return;
                }
                Err(err) => {
                    warn!(job_id = %job.id, recipient = %target, error = %err, "recipient undeliverable");
                    job.record_failure();
                    self.persist(&job).await;
                    sleep(self.pacer.failure_delay()).await;
                }
            }
        }

        job.complete();
        self.persist(&job).await;
        self.report(&job).await;
    }

    async fn report(&self, job: &BroadcastJob) {
        let summary = job.summary();
        info!(
            job_id = %job.id,
            sent = summary.sent,
            failed = summary.failed,
            total = summary.total,
            message = %summary.body,
            "broadcast finished"
        );
        let Some(operator) = &self.operator else {
            return;
        };
        let note = MessageContent::text(summary.to_message());
        if let Err(err) = self.sender.send(operator, &note).await {
            warn!(job_id = %job.id, error = %err, "could not deliver summary to operator");
        }
    }

    async fn persist(&self, job: &BroadcastJob) {
        if let Err(err) = self.jobs.save(job).await {
            error!(job_id = %job.id, error = %err, "failed to store job snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::application::services::pacing::PacingPolicy;
    use crate::application::services::safe_send::SendPolicy;
    use crate::application::services::transport::{SessionState, TransportClient};
    use crate::domain::errors::TransportError;
    use crate::domain::models::JobStatus;
    use crate::infrastructure::repositories::in_memory::InMemoryBroadcastJobRepository;

    struct RecordingTransport {
        sent: Mutex<Vec<(String, String)>>,
        fail_with: Option<fn() -> TransportError>,
    }

    impl RecordingTransport {
        fn succeeding() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(fail_with: fn() -> TransportError) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Some(fail_with),
            })
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransportClient for RecordingTransport {
        fn session_state(&self) -> SessionState {
            SessionState::Ready
        }

        async fn send_text(&self, target: &Jid, text: &str) -> Result<(), TransportError> {
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.sent
                .lock()
                .unwrap()
                .push((target.to_string(), text.to_string()));
            Ok(())
        }

        async fn send_image(
            &self,
            target: &Jid,
            _attachment: &str,
            caption: &str,
        ) -> Result<(), TransportError> {
            self.send_text(target, caption).await
        }
    }

    fn fast_pacing(daily_limit: u32) -> PacingPolicy {
        PacingPolicy {
            // start == end keeps the window open around the clock.
            start_hour: 0,
            end_hour: 0,
            daily_limit,
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            failure_delay: Duration::from_millis(1),
            quota_cooldown: Duration::from_millis(30),
            window_poll: Duration::from_millis(5),
        }
    }

    fn fast_send_policy(max_retries: u32) -> SendPolicy {
        SendPolicy {
            max_retries,
            call_timeout: Duration::from_millis(100),
            transient_backoff: Duration::from_millis(1),
            reconnect_backoff: Duration::from_millis(1),
        }
    }

    fn runner(
        transport: Arc<dyn TransportClient>,
        jobs: Arc<dyn BroadcastJobRepository>,
        daily_limit: u32,
        max_retries: u32,
        operator: Option<Jid>,
    ) -> Arc<BroadcastRunner> {
        let sender = Arc::new(SafeSender::new(transport, fast_send_policy(max_retries)));
        Arc::new(BroadcastRunner::new(
            sender,
            Pacer::new(fast_pacing(daily_limit)),
            jobs,
            RecipientDefaults::default(),
            operator,
        ))
    }

    #[tokio::test]
    async fn mixed_list_tallies_rejections_without_touching_the_transport() {
        let transport = RecordingTransport::succeeding();
        let jobs: Arc<dyn BroadcastJobRepository> =
            Arc::new(InMemoryBroadcastJobRepository::new());
        let runner = runner(transport.clone(), jobs.clone(), 100, 2, None);

        let job = BroadcastJob::new(
            MessageContent::text("hi"),
            vec![
                "9876543210".to_string(),
                "+919876543210@x".to_string(),
                "123".to_string(),
            ],
        );
        let handle = runner.spawn(job).await.unwrap();
        handle.task.await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        // Both valid spellings collapse onto the same canonical target.
        assert_eq!(sent[0].0, "919876543210@c.us");
        assert_eq!(sent[1].0, "919876543210@c.us");

        let job = jobs.get(handle.job_id).await.unwrap().unwrap();
        assert_eq!(job.sent, 2);
        assert_eq!(job.failed, 1);
        assert!(matches!(job.status, JobStatus::Completed));
    }

    #[tokio::test]
    async fn session_down_aborts_with_cursor_at_first_recipient() {
        let transport = RecordingTransport::failing(|| TransportError::SessionNotReady);
        let jobs: Arc<dyn BroadcastJobRepository> =
            Arc::new(InMemoryBroadcastJobRepository::new());
        let runner = runner(transport, jobs.clone(), 100, 2, None);

        let job = BroadcastJob::new(
            MessageContent::text("hi"),
            vec![
                "919876543210".to_string(),
                "919876543211".to_string(),
                "919876543212".to_string(),
            ],
        );
        let handle = runner.spawn(job).await.unwrap();
        handle.task.await.unwrap();

        let job = jobs.get(handle.job_id).await.unwrap().unwrap();
        assert_eq!(job.sent, 0);
        assert_eq!(job.cursor, 0);
        assert!(matches!(job.status, JobStatus::Aborted { .. }));
    }

    #[tokio::test]
    async fn quota_pause_resets_counter_and_resumes() {
        let transport = RecordingTransport::succeeding();
        let jobs: Arc<dyn BroadcastJobRepository> =
            Arc::new(InMemoryBroadcastJobRepository::new());
        let runner = runner(transport.clone(), jobs.clone(), 2, 2, None);

        let job = BroadcastJob::new(
            MessageContent::text("hi"),
            vec![
                "919876543210".to_string(),
                "919876543211".to_string(),
                "919876543212".to_string(),
            ],
        );
        let handle = runner.spawn(job).await.unwrap();
        handle.task.await.unwrap();

        assert_eq!(transport.sent().len(), 3);
        let job = jobs.get(handle.job_id).await.unwrap().unwrap();
        assert_eq!(job.sent, 3);
        assert_eq!(job.failed, 0);
        // Counter was reset at the quota pause, then one more send landed.
        assert_eq!(job.sent_today, 1);
        assert!(matches!(job.status, JobStatus::Completed));
    }

    #[tokio::test]
    async fn completion_summary_reaches_the_operator() {
        let transport = RecordingTransport::succeeding();
        let jobs: Arc<dyn BroadcastJobRepository> =
            Arc::new(InMemoryBroadcastJobRepository::new());
        let operator =
            Jid::normalize("917702597518", &RecipientDefaults::default()).unwrap();
        let runner = runner(transport.clone(), jobs.clone(), 100, 2, Some(operator.clone()));

        let job = BroadcastJob::new(
            MessageContent::text("launch day"),
            vec!["919876543210".to_string(), "bogus".to_string()],
        );
        let handle = runner.spawn(job).await.unwrap();
        handle.task.await.unwrap();

        let sent = transport.sent();
        let (last_target, last_text) = sent.last().unwrap();
        assert_eq!(last_target, operator.as_str());
        assert!(last_text.contains("1 sent"));
        assert!(last_text.contains("1 failed"));
        assert!(last_text.contains("launch day"));
    }

    #[tokio::test]
    async fn terminal_failures_do_not_stop_the_run() {
        let transport = RecordingTransport::failing(|| {
            TransportError::Rejected("blocked by transport".into())
        });
        let jobs: Arc<dyn BroadcastJobRepository> =
            Arc::new(InMemoryBroadcastJobRepository::new());
        let runner = runner(transport, jobs.clone(), 100, 2, None);

        let job = BroadcastJob::new(
            MessageContent::text("hi"),
            vec!["919876543210".to_string(), "919876543211".to_string()],
        );
        let handle = runner.spawn(job).await.unwrap();
        handle.task.await.unwrap();

        let job = jobs.get(handle.job_id).await.unwrap().unwrap();
        assert_eq!(job.sent, 0);
        assert_eq!(job.failed, 2);
        assert!(matches!(job.status, JobStatus::Completed));
    }
}
