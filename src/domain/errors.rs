use thiserror::Error;

/// Why a raw recipient identifier was rejected before any send attempt.
///
/// Rejections are terminal: the entry is counted as a failure and never
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("recipient is not a 12-15 digit identifier")]
    InvalidFormat,
}

/// Failure classification at the transport boundary.
///
/// The bridge client maps its wire-level errors into this enum so the rest of
/// the pipeline can decide between retrying, giving up on one recipient, or
/// giving up on the whole job.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport call timed out")]
    Timeout,
    #[error("transport connection lost: {0}")]
    ConnectionLost(String),
    #[error("transport resources exhausted: {0}")]
    Exhausted(String),
    #[error("transport session is not ready")]
    SessionNotReady,
    #[error("send rejected by transport: {0}")]
    Rejected(String),
}

impl TransportError {
    /// Worth another attempt with the same session.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout
                | TransportError::ConnectionLost(_)
                | TransportError::Exhausted(_)
        )
    }
}

/// Final verdict of one delivery (after retries are exhausted).
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// This recipient is undeliverable; the run continues with the next one.
    #[error("delivery failed after {attempts} attempt(s): {reason}")]
    Terminal { reason: String, attempts: u32 },
    /// The session itself is down. No further recipient can succeed until it
    /// is re-established, so the whole job must stop.
    #[error("transport session unavailable after {attempts} attempt(s)")]
    SessionDown { attempts: u32 },
}
