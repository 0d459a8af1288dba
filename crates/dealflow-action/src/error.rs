//! Error types for the action engine.

use dealflow_core::DealflowError;

/// Errors from action handlers and dispatch.
///
/// Validation and precondition failures are structurally identical failed
/// results; they differ by message content. Validation messages always
/// contain the word "required" so substring classification is reliable.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Precondition(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("PatchSet error: {0}")]
    Patch(String),
    #[error(transparent)]
    Core(#[from] DealflowError),
}

impl ActionError {
    /// Validation failure for a missing required field. The message is
    /// guaranteed to contain "required".
    pub fn missing_field(field: &str) -> Self {
        ActionError::Validation(format!("Parameter '{}' is required", field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_contains_required() {
        let err = ActionError::missing_field("next_action");
        assert_eq!(err.to_string(), "Parameter 'next_action' is required");
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_unknown_action_display() {
        let err = ActionError::UnknownAction("frobnicate".to_string());
        assert_eq!(err.to_string(), "Unknown action: frobnicate");
    }

    #[test]
    fn test_precondition_display_is_bare_message() {
        let err = ActionError::Precondition("No offer amount derivable".to_string());
        assert_eq!(err.to_string(), "No offer amount derivable");
    }

    #[test]
    fn test_core_error_passes_through() {
        let err: ActionError = DealflowError::Repository("down".to_string()).into();
        assert_eq!(err.to_string(), "Repository error: down");
    }
}
