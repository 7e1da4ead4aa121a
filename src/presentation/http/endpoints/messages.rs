use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::application::usecases::send_message::{SendMessageError, SendMessageRequest};
use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    requests::SendMessageRequestDto,
    responses::SendMessageResponseDto,
};

pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl MessagesEndpoints {
    /// Send one message synchronously; the classified outcome comes back in
    /// the response.
    #[oai(path = "/messages", method = "post", tag = EndpointsTags::Messages)]
    pub async fn send_message(
        &self,
        request: Json<SendMessageRequestDto>,
    ) -> PoemResult<Json<SendMessageResponseDto>> {
        self.state
            .send_message_usecase
            .execute(SendMessageRequest {
                recipient: request.recipient.clone(),
                message: request.message.clone(),
            })
            .await
            .map_err(map_send_error)?;

        Ok(Json(SendMessageResponseDto { success: true }))
    }
}

fn map_send_error(err: SendMessageError) -> poem::Error {
    let status = match &err {
        SendMessageError::InvalidRecipient(_) => poem::http::StatusCode::BAD_REQUEST,
        SendMessageError::SessionUnavailable => poem::http::StatusCode::SERVICE_UNAVAILABLE,
        SendMessageError::Delivery(_) => poem::http::StatusCode::BAD_GATEWAY,
    };
    poem::Error::from_string(err.to_string(), status)
}
