use std::sync::Arc;

use thiserror::Error;

use crate::application::services::safe_send::SafeSender;
use crate::domain::errors::{DeliveryError, RejectionReason};
use crate::domain::models::MessageContent;
use crate::domain::value_objects::{Jid, RecipientDefaults};

/// Classified outcome of a synchronous single send, surfaced directly to the
/// HTTP caller.
#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("invalid recipient: {0}")]
    InvalidRecipient(#[from] RejectionReason),
    #[error("transport session is not ready")]
    SessionUnavailable,
    #[error(transparent)]
    Delivery(DeliveryError),
}

pub struct SendMessageUseCase {
    sender: Arc<SafeSender>,
    defaults: RecipientDefaults,
}

pub struct SendMessageRequest {
    pub recipient: String,
    pub message: String,
}

impl SendMessageUseCase {
    pub fn new(sender: Arc<SafeSender>, defaults: RecipientDefaults) -> Self {
        Self { sender, defaults }
    }

    pub async fn execute(&self, request: SendMessageRequest) -> Result<(), SendMessageError> {
        if !self.sender.transport().session_state().is_ready() {
            return Err(SendMessageError::SessionUnavailable);
        }

        let target = Jid::normalize(&request.recipient, &self.defaults)?;
        match self
            .sender
            .send(&target, &MessageContent::text(request.message))
            .await
        {
            Ok(()) => Ok(()),
            Err(DeliveryError::SessionDown { .. }) => Err(SendMessageError::SessionUnavailable),
            Err(err) => Err(SendMessageError::Delivery(err)),
        }
    }
}
