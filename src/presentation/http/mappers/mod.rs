use crate::domain::models::{BroadcastJob, JobStatus};
use crate::presentation::http::responses::BroadcastJobDto;
use crate::presentation::models::JobStatusKind;

pub fn map_job(job: &BroadcastJob) -> BroadcastJobDto {
    BroadcastJobDto {
        job_id: job.id,
        status: JobStatusKind::from(&job.status),
        abort_reason: extract_abort_reason(&job.status),
        total: job.recipients.len() as u32,
        cursor: job.cursor as u32,
        sent: job.sent,
        failed: job.failed,
        sent_today: job.sent_today,
        message: job.content.body.clone(),
        attachment: job.content.attachment.clone(),
        created_at: job.created_at.to_rfc3339(),
        updated_at: job.updated_at.to_rfc3339(),
    }
}

fn extract_abort_reason(status: &JobStatus) -> Option<String> {
    match status {
        JobStatus::Aborted { reason } => Some(reason.clone()),
        _ => None,
    }
}
