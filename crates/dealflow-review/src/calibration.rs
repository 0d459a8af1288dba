//! Calibration seam for the confidence gate.
//!
//! The gate forwards every resolved review to a calibrator. A calibrator
//! may also override the configured threshold for a situation; the default
//! implementation only records, leaving thresholds to configuration.

use std::sync::Mutex;

use crate::types::{ReviewEvent, Situation};

pub trait Calibrator: Send + Sync {
    /// Observe one resolved review.
    fn observe(&self, event: &ReviewEvent);

    /// An adjusted 0-1 threshold for the situation, or `None` to keep the
    /// configured one.
    fn threshold_override(&self, situation: Situation) -> Option<f32>;
}

/// Records review outcomes without adjusting thresholds.
#[derive(Default)]
pub struct RecordingCalibrator {
    events: Mutex<Vec<ReviewEvent>>,
}

impl RecordingCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReviewEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Calibrator for RecordingCalibrator {
    fn observe(&self, event: &ReviewEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn threshold_override(&self, _situation: Situation) -> Option<f32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReviewDecision;
    use dealflow_core::Timestamp;
    use uuid::Uuid;

    fn sample_event() -> ReviewEvent {
        ReviewEvent {
            message_id: Uuid::new_v4(),
            situation: Situation::WarmLead,
            confidence: 0.72,
            threshold: 0.85,
            decision: ReviewDecision::Approved,
            feedback: None,
            decided_at: Timestamp::now(),
        }
    }

    #[test]
    fn test_recording_calibrator_stores_events_in_order() {
        let cal = RecordingCalibrator::new();
        let first = sample_event();
        let second = sample_event();
        cal.observe(&first);
        cal.observe(&second);

        let events = cal.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message_id, first.message_id);
        assert_eq!(events[1].message_id, second.message_id);
    }

    #[test]
    fn test_recording_calibrator_never_overrides() {
        let cal = RecordingCalibrator::new();
        assert!(cal.threshold_override(Situation::Negotiating).is_none());
    }
}
