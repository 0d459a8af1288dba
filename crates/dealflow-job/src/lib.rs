//! Asynchronous job tracking for Dealflow.
//!
//! Defines the job lifecycle state machine, the external job-runner
//! contract, and the polling watcher that follows a job to completion.

pub mod error;
pub mod runner;
pub mod state_machine;
pub mod types;
pub mod watcher;

pub use error::JobError;
pub use runner::JobRunner;
pub use state_machine::validate_transition;
pub use types::{Job, JobRequest, JobStatus, JobType, JobTypeConfig};
pub use watcher::{JobWatcher, WatchState};
