//! External job-runner contract.
//!
//! The runner owns job state: it accepts submissions, advances status and
//! progress, and reports terminal results. This crate only reads that state
//! (and forwards cancellation requests).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::JobError;
use crate::types::{Job, JobRequest};

/// Interface to the external job runner.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Submit a job for execution, returning its id.
    async fn submit(&self, request: JobRequest) -> Result<Uuid, JobError>;

    /// Fetch the current state of a job.
    async fn fetch(&self, id: Uuid) -> Result<Job, JobError>;

    /// Request cancellation of a job.
    ///
    /// Whether a job type should be *offered* cancellation is display
    /// policy (`JobTypeConfig::cancellable`); the runner decides what a
    /// cancellation request does to an in-flight job.
    async fn cancel(&self, id: Uuid) -> Result<(), JobError>;
}
