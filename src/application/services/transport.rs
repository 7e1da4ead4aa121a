use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::TransportError;
use crate::domain::value_objects::Jid;

/// Lifecycle of the bridge session behind the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotReady,
    Ready,
    Closed,
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}

/// Outbound boundary towards the messaging bridge.
///
/// Implementations classify their wire-level failures into [`TransportError`]
/// so callers never see raw HTTP or I/O errors.
#[async_trait]
pub trait TransportClient: Send + Sync {
    fn session_state(&self) -> SessionState;
    async fn send_text(&self, target: &Jid, text: &str) -> Result<(), TransportError>;
    async fn send_image(
        &self,
        target: &Jid,
        attachment: &str,
        caption: &str,
    ) -> Result<(), TransportError>;
}

/// Decorator that serializes every transport call through one async mutex.
///
/// The bridge session is a single stateful connection that does not tolerate
/// overlapping calls, so at most one send may be in flight system-wide, no
/// matter how many jobs are running.
pub struct SerialTransport {
    inner: Arc<dyn TransportClient>,
    gate: Mutex<()>,
}

impl SerialTransport {
    pub fn new(inner: Arc<dyn TransportClient>) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
        }
    }
}

#[async_trait]
impl TransportClient for SerialTransport {
    fn session_state(&self) -> SessionState {
        self.inner.session_state()
    }

    async fn send_text(&self, target: &Jid, text: &str) -> Result<(), TransportError> {
        let _gate = self.gate.lock().await;
        self.inner.send_text(target, text).await
    }

    async fn send_image(
        &self,
        target: &Jid,
        attachment: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        let _gate = self.gate.lock().await;
        self.inner.send_image(target, attachment, caption).await
    }
}
