use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::services::transport::TransportClient;
use crate::application::usecases::{
    get_job::GetJobUseCase, list_jobs::ListJobsUseCase, send_message::SendMessageUseCase,
    start_broadcast::StartBroadcastUseCase,
};

pub struct ApiState {
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub start_broadcast_usecase: Arc<StartBroadcastUseCase>,
    pub get_job_usecase: Arc<GetJobUseCase>,
    pub list_jobs_usecase: Arc<ListJobsUseCase>,
    pub transport: Arc<dyn TransportClient>,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Messages,
    Broadcasts,
    Session,
}

pub struct Endpoints;
