//! Job status state machine with validated transitions.
//!
//! Enforces the allowed transitions for the job lifecycle:
//! Queued -> Running -> Succeeded/Failed/Cancelled
//! Queued -> Cancelled

use crate::error::JobError;
use crate::types::JobStatus;

/// Validate that a status transition is allowed.
///
/// Valid transitions:
/// - Queued -> Running
/// - Queued -> Cancelled
/// - Running -> Succeeded
/// - Running -> Failed
/// - Running -> Cancelled
///
/// Terminal states are absorbing: no transition out of Succeeded, Failed,
/// or Cancelled is valid.
pub fn validate_transition(from: JobStatus, to: JobStatus) -> Result<(), JobError> {
    let valid = matches!(
        (from, to),
        (JobStatus::Queued, JobStatus::Running)
            | (JobStatus::Queued, JobStatus::Cancelled)
            | (JobStatus::Running, JobStatus::Succeeded)
            | (JobStatus::Running, JobStatus::Failed)
            | (JobStatus::Running, JobStatus::Cancelled)
    );

    if valid {
        Ok(())
    } else {
        Err(JobError::InvalidTransition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [JobStatus; 5] = [
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Succeeded,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ];

    // =====================================================================
    // Valid transitions
    // =====================================================================

    #[test]
    fn test_queued_to_running() {
        assert!(validate_transition(JobStatus::Queued, JobStatus::Running).is_ok());
    }

    #[test]
    fn test_queued_to_cancelled() {
        assert!(validate_transition(JobStatus::Queued, JobStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_running_to_succeeded() {
        assert!(validate_transition(JobStatus::Running, JobStatus::Succeeded).is_ok());
    }

    #[test]
    fn test_running_to_failed() {
        assert!(validate_transition(JobStatus::Running, JobStatus::Failed).is_ok());
    }

    #[test]
    fn test_running_to_cancelled() {
        assert!(validate_transition(JobStatus::Running, JobStatus::Cancelled).is_ok());
    }

    // =====================================================================
    // Invalid transitions
    // =====================================================================

    #[test]
    fn test_queued_to_succeeded_invalid() {
        assert!(validate_transition(JobStatus::Queued, JobStatus::Succeeded).is_err());
    }

    #[test]
    fn test_queued_to_failed_invalid() {
        assert!(validate_transition(JobStatus::Queued, JobStatus::Failed).is_err());
    }

    #[test]
    fn test_running_to_queued_invalid() {
        assert!(validate_transition(JobStatus::Running, JobStatus::Queued).is_err());
    }

    #[test]
    fn test_self_transitions_invalid() {
        for state in ALL_STATES {
            assert!(validate_transition(state, state).is_err());
        }
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        for from in [JobStatus::Succeeded, JobStatus::Failed, JobStatus::Cancelled] {
            for to in ALL_STATES {
                assert!(
                    validate_transition(from, to).is_err(),
                    "{} -> {} should be invalid",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_all_valid_transitions_count() {
        let mut valid_count = 0;
        for from in ALL_STATES {
            for to in ALL_STATES {
                if validate_transition(from, to).is_ok() {
                    valid_count += 1;
                }
            }
        }
        assert_eq!(valid_count, 5, "Expected exactly 5 valid transitions");
    }

    // =====================================================================
    // Error message tests
    // =====================================================================

    #[test]
    fn test_invalid_transition_error_message() {
        let err = validate_transition(JobStatus::Succeeded, JobStatus::Running).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("succeeded"), "Error should mention source state");
        assert!(msg.contains("running"), "Error should mention target state");
    }
}
