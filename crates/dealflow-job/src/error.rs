//! Error types for job submission and tracking.

use crate::types::JobStatus;
use uuid::Uuid;

/// Errors from the job runner and watcher.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job submission failed: {0}")]
    Submit(String),
    #[error("Job not found: {0}")]
    NotFound(Uuid),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid status transition: {0} -> {1}")]
    InvalidTransition(JobStatus, JobStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_display() {
        let err = JobError::Submit("runner unavailable".to_string());
        assert_eq!(err.to_string(), "Job submission failed: runner unavailable");

        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let err = JobError::NotFound(id);
        assert_eq!(
            err.to_string(),
            "Job not found: 550e8400-e29b-41d4-a716-446655440000"
        );

        let err = JobError::Transport("connection reset".to_string());
        assert_eq!(err.to_string(), "Transport error: connection reset");

        let err = JobError::InvalidTransition(JobStatus::Succeeded, JobStatus::Running);
        assert_eq!(
            err.to_string(),
            "Invalid status transition: succeeded -> running"
        );
    }
}
