use poem_openapi::Enum;

use crate::application::services::transport::SessionState;
use crate::domain::models::JobStatus;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum JobStatusKind {
    #[oai(rename = "running")]
    Running,
    #[oai(rename = "completed")]
    Completed,
    #[oai(rename = "aborted")]
    Aborted,
}

impl From<&JobStatus> for JobStatusKind {
    fn from(value: &JobStatus) -> Self {
        match value {
            JobStatus::Running => JobStatusKind::Running,
            JobStatus::Completed => JobStatusKind::Completed,
            JobStatus::Aborted { .. } => JobStatusKind::Aborted,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionStateKind {
    #[oai(rename = "not_ready")]
    NotReady,
    #[oai(rename = "ready")]
    Ready,
    #[oai(rename = "closed")]
    Closed,
}

impl From<SessionState> for SessionStateKind {
    fn from(value: SessionState) -> Self {
        match value {
            SessionState::NotReady => SessionStateKind::NotReady,
            SessionState::Ready => SessionStateKind::Ready,
            SessionState::Closed => SessionStateKind::Closed,
        }
    }
}
