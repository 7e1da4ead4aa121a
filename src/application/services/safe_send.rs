use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::application::services::transport::TransportClient;
use crate::domain::errors::{DeliveryError, TransportError};
use crate::domain::models::MessageContent;
use crate::domain::value_objects::Jid;

/// Retry and timeout settings for one delivery.
///
/// These are configuration, not constants: deployments tune them per
/// bridge (`SEND_MAX_RETRIES` etc. in [`crate::config::Config`]).
#[derive(Debug, Clone)]
pub struct SendPolicy {
    pub max_retries: u32,
    pub call_timeout: Duration,
    /// Backoff base for timeouts and resource exhaustion.
    pub transient_backoff: Duration,
    /// Backoff base when the connection or session dropped; reconnects take
    /// longer than a flaky call, so this base is larger.
    pub reconnect_backoff: Duration,
}

impl Default for SendPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            call_timeout: Duration::from_secs(30),
            transient_backoff: Duration::from_secs(3),
            reconnect_backoff: Duration::from_secs(5),
        }
    }
}

/// Wraps a single delivery with a call timeout, failure classification and
/// bounded linear backoff.
///
/// Performs at most `max_retries + 1` transport calls. Knows nothing about
/// pacing or quotas; that is the runner's business.
pub struct SafeSender {
    transport: Arc<dyn TransportClient>,
    policy: SendPolicy,
}

impl SafeSender {
    pub fn new(transport: Arc<dyn TransportClient>, policy: SendPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &Arc<dyn TransportClient> {
        &self.transport
    }

    pub async fn send(&self, target: &Jid, content: &MessageContent) -> Result<(), DeliveryError> {
        for attempt in 0..=self.policy.max_retries {
            let attempts = attempt + 1;
            let err = match self.call(target, content).await {
                Ok(()) => {
                    if attempt > 0 {
                        debug!(recipient = %target, attempts, "delivery succeeded after retry");
                    }
                    return Ok(());
                }
                Err(err) => err,
            };

            let exhausted = attempt == self.policy.max_retries;
            match err {
                TransportError::SessionNotReady => {
                    if exhausted {
                        return Err(DeliveryError::SessionDown { attempts });
                    }
                    warn!(recipient = %target, attempt = attempts, "session not ready, will retry");
                    sleep(self.backoff(&err, attempt)).await;
                }
                ref err if err.is_transient() => {
                    if exhausted {
                        return Err(DeliveryError::Terminal {
                            reason: err.to_string(),
                            attempts,
                        });
                    }
                    warn!(recipient = %target, attempt = attempts, error = %err, "transient send failure, will retry");
                    sleep(self.backoff(err, attempt)).await;
                }
                err => {
                    return Err(DeliveryError::Terminal {
                        reason: err.to_string(),
                        attempts,
                    });
                }
            }
        }
        unreachable!("send loop always returns within max_retries + 1 attempts")
    }

    async fn call(&self, target: &Jid, content: &MessageContent) -> Result<(), TransportError> {
        let call = async {
            match &content.attachment {
                Some(attachment) => {
                    self.transport
                        .send_image(target, attachment, &content.body)
                        .await
                }
                None => self.transport.send_text(target, &content.body).await,
            }
        };
        match timeout(self.policy.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }

    /// Linear backoff: `base * (attempt + 1)`, with the larger base for the
    /// connection-loss class.
    fn backoff(&self, err: &TransportError, attempt: u32) -> Duration {
        let base = match err {
            TransportError::ConnectionLost(_) | TransportError::SessionNotReady => {
                self.policy.reconnect_backoff
            }
            _ => self.policy.transient_backoff,
        };
        base * (attempt + 1)
    }
}
