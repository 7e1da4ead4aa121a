pub mod get_job;
pub mod list_jobs;
pub mod send_message;
pub mod start_broadcast;
