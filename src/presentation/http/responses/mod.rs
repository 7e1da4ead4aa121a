use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::{JobStatusKind, SessionStateKind};

#[derive(Object)]
pub struct SendMessageResponseDto {
    pub success: bool,
}

#[derive(Object)]
pub struct StartBroadcastResponseDto {
    pub success: bool,
    pub status: String,
    pub job_id: Uuid,
}

#[derive(Object)]
pub struct BroadcastJobDto {
    pub job_id: Uuid,
    pub status: JobStatusKind,
    pub abort_reason: Option<String>,
    pub total: u32,
    pub cursor: u32,
    pub sent: u32,
    pub failed: u32,
    pub sent_today: u32,
    pub message: String,
    pub attachment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
pub struct SessionStatusDto {
    pub ready: bool,
    pub state: SessionStateKind,
}
