use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Path, payload::Json};

use crate::application::usecases::start_broadcast::StartBroadcastRequest;
use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    mappers::map_job,
    requests::StartBroadcastRequestDto,
    responses::{BroadcastJobDto, StartBroadcastResponseDto},
};

pub struct BroadcastsEndpoints {
    state: Arc<ApiState>,
}

impl BroadcastsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl BroadcastsEndpoints {
    /// Start a broadcast and return immediately; progress is visible via the
    /// job endpoints while the runner works through the list.
    #[oai(path = "/broadcasts", method = "post", tag = EndpointsTags::Broadcasts)]
    pub async fn start_broadcast(
        &self,
        request: Json<StartBroadcastRequestDto>,
    ) -> PoemResult<Json<StartBroadcastResponseDto>> {
        let response = self
            .state
            .start_broadcast_usecase
            .execute(StartBroadcastRequest {
                message: request.message.clone(),
                recipient_list_id: request.recipient_list_id.clone(),
                attachment: request.attachment.clone(),
            })
            .await
            .map_err(|e| {
                if e.to_string().contains("not found") {
                    poem::Error::from_string(
                        "recipient list not found",
                        poem::http::StatusCode::NOT_FOUND,
                    )
                } else if e.to_string().contains("empty") {
                    bad_request(e)
                } else {
                    internal_error(e)
                }
            })?;

        Ok(Json(StartBroadcastResponseDto {
            success: true,
            status: "started".to_string(),
            job_id: response.job_id,
        }))
    }

    #[oai(path = "/broadcasts", method = "get", tag = EndpointsTags::Broadcasts)]
    pub async fn list_broadcasts(&self) -> PoemResult<Json<Vec<BroadcastJobDto>>> {
        let jobs = self
            .state
            .list_jobs_usecase
            .execute()
            .await
            .map_err(internal_error)?;

        Ok(Json(jobs.iter().map(map_job).collect()))
    }

    #[oai(
        path = "/broadcasts/:job_id",
        method = "get",
        tag = EndpointsTags::Broadcasts
    )]
    pub async fn get_broadcast(
        &self,
        job_id: Path<uuid::Uuid>,
    ) -> PoemResult<Json<BroadcastJobDto>> {
        let job = self
            .state
            .get_job_usecase
            .execute(job_id.0)
            .await
            .map_err(internal_error)?
            .ok_or_else(|| {
                poem::Error::from_string("broadcast not found", poem::http::StatusCode::NOT_FOUND)
            })?;

        Ok(Json(map_job(&job)))
    }
}

fn internal_error(err: anyhow::Error) -> poem::Error {
    poem::Error::from_string(
        err.to_string(),
        poem::http::StatusCode::INTERNAL_SERVER_ERROR,
    )
}

fn bad_request(err: anyhow::Error) -> poem::Error {
    poem::Error::from_string(err.to_string(), poem::http::StatusCode::BAD_REQUEST)
}
