//! Confidence gate: auto-send vs review queue.
//!
//! A draft auto-sends only when the master switch is on, the situation's
//! policy is enabled, and the draft's confidence meets the effective
//! threshold. Everything else waits in the review queue until a human
//! resolves it; resolutions are forwarded to the calibrator.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};
use uuid::Uuid;

use dealflow_core::{config::AutoSendConfig, Timestamp};

use crate::calibration::Calibrator;
use crate::error::ReviewError;
use crate::types::{
    ConfidenceRecord, DraftMessage, Feedback, GateDecision, ReviewDecision, ReviewEvent,
};

pub struct ConfidenceGate {
    config: AutoSendConfig,
    calibrator: Arc<dyn Calibrator>,
    queue: Mutex<VecDeque<(DraftMessage, ConfidenceRecord)>>,
}

impl ConfidenceGate {
    pub fn new(config: AutoSendConfig, calibrator: Arc<dyn Calibrator>) -> Self {
        Self {
            config,
            calibrator,
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// The 0-1 threshold in effect for a situation: the calibrator's
    /// override when it has one, else the configured policy.
    fn effective_threshold(&self, situation: crate::types::Situation) -> f32 {
        self.calibrator
            .threshold_override(situation)
            .unwrap_or_else(|| {
                self.config
                    .policy_for(&situation.to_string())
                    .threshold_fraction()
            })
    }

    /// Gate one draft. Auto-send drafts are returned to the caller for
    /// transmission; everything else is queued for review.
    pub fn evaluate(&self, draft: DraftMessage) -> GateDecision {
        let policy = self.config.policy_for(&draft.situation.to_string());
        let threshold = self.effective_threshold(draft.situation);
        let record = ConfidenceRecord {
            confidence: draft.confidence,
            situation: draft.situation,
            threshold,
        };

        let reason = if !self.config.enabled {
            Some("auto-send is disabled globally".to_string())
        } else if !policy.enabled {
            Some(format!(
                "auto-send is disabled for situation '{}'",
                draft.situation
            ))
        } else if draft.confidence < threshold {
            Some(format!(
                "confidence {:.2} below threshold {:.2}",
                draft.confidence, threshold
            ))
        } else {
            None
        };

        match reason {
            None => {
                info!(
                    message_id = %draft.id,
                    situation = %draft.situation,
                    confidence = draft.confidence,
                    "Draft auto-sent"
                );
                GateDecision::AutoSend
            }
            Some(reason) => {
                debug!(
                    message_id = %draft.id,
                    situation = %draft.situation,
                    %reason,
                    "Draft queued for review"
                );
                self.queue.lock().unwrap().push_back((draft, record));
                GateDecision::NeedsReview(reason)
            }
        }
    }

    /// Number of drafts waiting for review.
    pub fn pending_count(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Drafts currently waiting for review, oldest first.
    pub fn pending(&self) -> Vec<DraftMessage> {
        self.queue
            .lock()
            .unwrap()
            .iter()
            .map(|(draft, _)| draft.clone())
            .collect()
    }

    /// Resolve one queued draft with a reviewer verdict. The resolution is
    /// forwarded to the calibrator and returned for audit.
    pub fn resolve(
        &self,
        message_id: Uuid,
        decision: ReviewDecision,
        feedback: Option<Feedback>,
    ) -> Result<ReviewEvent, ReviewError> {
        let (draft, record) = {
            let mut queue = self.queue.lock().unwrap();
            let idx = queue
                .iter()
                .position(|(draft, _)| draft.id == message_id)
                .ok_or(ReviewError::UnknownMessage(message_id))?;
            queue.remove(idx).ok_or(ReviewError::UnknownMessage(message_id))?
        };

        let event = ReviewEvent {
            message_id: draft.id,
            situation: record.situation,
            confidence: record.confidence,
            threshold: record.threshold,
            decision,
            feedback,
            decided_at: Timestamp::now(),
        };
        self.calibrator.observe(&event);
        info!(
            message_id = %event.message_id,
            situation = %event.situation,
            decision = ?event.decision,
            "Review resolved"
        );
        Ok(event)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::RecordingCalibrator;
    use crate::types::Situation;
    use dealflow_core::config::SituationPolicy;

    fn gate_with(config: AutoSendConfig) -> (ConfidenceGate, Arc<RecordingCalibrator>) {
        let calibrator = Arc::new(RecordingCalibrator::new());
        (
            ConfidenceGate::new(config, calibrator.clone()),
            calibrator,
        )
    }

    fn enabled_config(situation: &str, threshold: f32) -> AutoSendConfig {
        let mut config = AutoSendConfig {
            enabled: true,
            ..AutoSendConfig::default()
        };
        config.situations.insert(
            situation.to_string(),
            SituationPolicy {
                enabled: true,
                threshold,
            },
        );
        config
    }

    fn draft(situation: Situation, confidence: f32) -> DraftMessage {
        DraftMessage::new(Uuid::new_v4(), situation, confidence, "Hi there")
    }

    // ---- evaluate ----

    #[test]
    fn test_global_switch_off_never_auto_sends() {
        let mut config = enabled_config("warm_lead", 70.0);
        config.enabled = false;
        let (gate, _) = gate_with(config);

        let decision = gate.evaluate(draft(Situation::WarmLead, 0.99));
        assert!(matches!(decision, GateDecision::NeedsReview(_)));
        assert_eq!(gate.pending_count(), 1);
    }

    #[test]
    fn test_above_threshold_auto_sends() {
        let (gate, _) = gate_with(enabled_config("warm_lead", 70.0));
        let decision = gate.evaluate(draft(Situation::WarmLead, 0.75));
        assert_eq!(decision, GateDecision::AutoSend);
        assert_eq!(gate.pending_count(), 0);
    }

    #[test]
    fn test_exactly_at_threshold_auto_sends() {
        let (gate, _) = gate_with(enabled_config("warm_lead", 70.0));
        let decision = gate.evaluate(draft(Situation::WarmLead, 0.70));
        assert_eq!(decision, GateDecision::AutoSend);
    }

    #[test]
    fn test_below_threshold_never_auto_sent_even_with_other_situations_enabled() {
        let mut config = enabled_config("warm_lead", 70.0);
        config.situations.insert(
            "negotiating".to_string(),
            SituationPolicy {
                enabled: true,
                threshold: 10.0,
            },
        );
        let (gate, _) = gate_with(config);

        let decision = gate.evaluate(draft(Situation::WarmLead, 0.60));
        match decision {
            GateDecision::NeedsReview(reason) => assert!(reason.contains("below threshold")),
            other => panic!("expected needs_review, got {:?}", other),
        }
        assert_eq!(gate.pending_count(), 1);
    }

    #[test]
    fn test_situation_without_policy_goes_to_review() {
        let mut config = AutoSendConfig::default();
        config.enabled = true;
        let (gate, _) = gate_with(config);

        let decision = gate.evaluate(draft(Situation::ColdLead, 0.99));
        match decision {
            GateDecision::NeedsReview(reason) => {
                assert!(reason.contains("cold_lead"));
            }
            other => panic!("expected needs_review, got {:?}", other),
        }
    }

    #[test]
    fn test_queue_preserves_arrival_order() {
        let (gate, _) = gate_with(AutoSendConfig::default());
        let first = draft(Situation::WarmLead, 0.5);
        let second = draft(Situation::Negotiating, 0.4);
        let first_id = first.id;
        let second_id = second.id;

        gate.evaluate(first);
        gate.evaluate(second);

        let pending = gate.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, first_id);
        assert_eq!(pending[1].id, second_id);
    }

    // ---- calibrator override ----

    struct FixedOverride(f32);

    impl Calibrator for FixedOverride {
        fn observe(&self, _event: &ReviewEvent) {}
        fn threshold_override(&self, _situation: Situation) -> Option<f32> {
            Some(self.0)
        }
    }

    #[test]
    fn test_calibrator_override_wins_over_config() {
        let gate = ConfidenceGate::new(
            enabled_config("warm_lead", 70.0),
            Arc::new(FixedOverride(0.95)),
        );
        // 0.80 clears the configured 0.70 but not the override.
        let decision = gate.evaluate(draft(Situation::WarmLead, 0.80));
        assert!(matches!(decision, GateDecision::NeedsReview(_)));
    }

    // ---- resolve ----

    #[test]
    fn test_resolve_removes_from_queue_and_feeds_calibrator() {
        let (gate, calibrator) = gate_with(AutoSendConfig::default());
        let message = draft(Situation::Negotiating, 0.55);
        let id = message.id;
        gate.evaluate(message);

        let event = gate
            .resolve(id, ReviewDecision::Approved, Some(Feedback::Helpful))
            .unwrap();
        assert_eq!(event.message_id, id);
        assert_eq!(event.decision, ReviewDecision::Approved);
        assert_eq!(event.feedback, Some(Feedback::Helpful));
        assert!((event.confidence - 0.55).abs() < f32::EPSILON);
        assert_eq!(gate.pending_count(), 0);

        let observed = calibrator.events();
        assert_eq!(observed.len(), 1);
        assert_eq!(observed[0].message_id, id);
    }

    #[test]
    fn test_resolve_unknown_message() {
        let (gate, _) = gate_with(AutoSendConfig::default());
        let err = gate
            .resolve(Uuid::new_v4(), ReviewDecision::Rejected, None)
            .unwrap_err();
        assert!(matches!(err, ReviewError::UnknownMessage(_)));
    }

    #[test]
    fn test_resolve_out_of_order() {
        let (gate, _) = gate_with(AutoSendConfig::default());
        let first = draft(Situation::WarmLead, 0.5);
        let second = draft(Situation::WarmLead, 0.4);
        let first_id = first.id;
        let second_id = second.id;
        gate.evaluate(first);
        gate.evaluate(second);

        gate.resolve(second_id, ReviewDecision::Rejected, None).unwrap();
        assert_eq!(gate.pending_count(), 1);
        assert_eq!(gate.pending()[0].id, first_id);
    }
}
