use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::application::services::transport::{SessionState, TransportClient};
use crate::domain::errors::TransportError;
use crate::domain::value_objects::Jid;

const STATE_NOT_READY: u8 = 0;
const STATE_READY: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// HTTP client for the messaging bridge sidecar.
///
/// The bridge owns the authenticated session (QR pairing happens over
/// there); this client only sends messages and tracks whether the session is
/// usable. Wire-level failures are classified into [`TransportError`] here so
/// nothing upstream ever handles a raw HTTP error.
pub struct BridgeTransport {
    http: Client,
    base_url: String,
    state: AtomicU8,
}

impl BridgeTransport {
    pub fn new(base_url: &str, call_timeout: Duration) -> Self {
        Self {
            http: Client::builder()
                .user_agent("broadcaster/bridge")
                .timeout(call_timeout)
                .build()
                .expect("failed to build bridge client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            state: AtomicU8::new(STATE_NOT_READY),
        }
    }

    /// Keep the readiness flag in sync with the bridge.
    ///
    /// The flag is written only here; everyone else reads it through
    /// [`TransportClient::session_state`].
    pub fn spawn_status_poller(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let bridge = self;
        tokio::spawn(async move {
            loop {
                let next = match bridge.fetch_status().await {
                    Ok(status) if status.closed => STATE_CLOSED,
                    Ok(status) if status.connected => STATE_READY,
                    Ok(_) => STATE_NOT_READY,
                    Err(err) => {
                        debug!(error = %err, "bridge status poll failed");
                        STATE_NOT_READY
                    }
                };
                let previous = bridge.state.swap(next, Ordering::SeqCst);
                if previous != next {
                    match next {
                        STATE_READY => info!("bridge session ready"),
                        STATE_CLOSED => warn!("bridge session closed"),
                        _ => warn!("bridge session not ready"),
                    }
                }
                sleep(interval).await;
            }
        })
    }

    async fn fetch_status(&self) -> anyhow::Result<BridgeStatus> {
        let url = format!("{}/status", self.base_url);
        let response = self.http.get(url).send().await?;
        Ok(response.json::<BridgeStatus>().await?)
    }

    async fn post(&self, method: &str, payload: impl Serialize) -> Result<(), TransportError> {
        let url = format!("{}/{}", self.base_url, method);
        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.json::<BridgeErrorBody>().await.unwrap_or_default();
        Err(classify_bridge_error(status, body))
    }
}

#[async_trait]
impl TransportClient for BridgeTransport {
    fn session_state(&self) -> SessionState {
        match self.state.load(Ordering::SeqCst) {
            STATE_READY => SessionState::Ready,
            STATE_CLOSED => SessionState::Closed,
            _ => SessionState::NotReady,
        }
    }

    async fn send_text(&self, target: &Jid, text: &str) -> Result<(), TransportError> {
        self.post(
            "send-text",
            SendTextPayload {
                target: target.as_str(),
                text,
            },
        )
        .await
    }

    async fn send_image(
        &self,
        target: &Jid,
        attachment: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.post(
            "send-image",
            SendImagePayload {
                target: target.as_str(),
                path: attachment,
                caption,
            },
        )
        .await
    }
}

fn classify_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::ConnectionLost(err.to_string())
    }
}

fn classify_bridge_error(status: StatusCode, body: BridgeErrorBody) -> TransportError {
    let message = body
        .error
        .unwrap_or_else(|| format!("bridge returned {status}"));
    match body.code.as_deref() {
        Some("SESSION_NOT_READY") | Some("NOT_AUTHENTICATED") => TransportError::SessionNotReady,
        Some("DISCONNECTED") | Some("SESSION_CLOSED") => TransportError::ConnectionLost(message),
        Some("RESOURCE_EXHAUSTED") => TransportError::Exhausted(message),
        Some(_) => TransportError::Rejected(message),
        None => match status {
            StatusCode::SERVICE_UNAVAILABLE => TransportError::SessionNotReady,
            StatusCode::TOO_MANY_REQUESTS => TransportError::Exhausted(message),
            _ => TransportError::Rejected(message),
        },
    }
}

#[derive(Serialize)]
struct SendTextPayload<'a> {
    target: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct SendImagePayload<'a> {
    target: &'a str,
    path: &'a str,
    caption: &'a str,
}

#[derive(Debug, Deserialize)]
struct BridgeStatus {
    connected: bool,
    /// Set once the bridge has torn the session down for good.
    #[serde(default)]
    closed: bool,
}

#[derive(Debug, Default, Deserialize)]
struct BridgeErrorBody {
    error: Option<String>,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_codes_take_precedence_over_http_status() {
        let err = classify_bridge_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            BridgeErrorBody {
                error: Some("session expired".into()),
                code: Some("SESSION_NOT_READY".into()),
            },
        );
        assert!(matches!(err, TransportError::SessionNotReady));
    }

    #[test]
    fn service_unavailable_without_code_maps_to_not_ready() {
        let err = classify_bridge_error(StatusCode::SERVICE_UNAVAILABLE, BridgeErrorBody::default());
        assert!(matches!(err, TransportError::SessionNotReady));
    }

    #[test]
    fn unknown_errors_are_terminal_rejections() {
        let err = classify_bridge_error(
            StatusCode::BAD_REQUEST,
            BridgeErrorBody {
                error: Some("unknown recipient".into()),
                code: None,
            },
        );
        match err {
            TransportError::Rejected(message) => assert!(message.contains("unknown recipient")),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn throttling_maps_to_exhaustion() {
        let err = classify_bridge_error(StatusCode::TOO_MANY_REQUESTS, BridgeErrorBody::default());
        assert!(matches!(err, TransportError::Exhausted(_)));
    }
}
