//! Confidence gate and review queue for assistant-drafted messages.
//!
//! Every outbound draft carries a confidence score; the gate decides
//! between auto-send and human review based on per-situation policy, and
//! review outcomes are fed back to a calibrator for future threshold
//! tuning.

pub mod calibration;
pub mod error;
pub mod gate;
pub mod types;

pub use calibration::{Calibrator, RecordingCalibrator};
pub use error::ReviewError;
pub use gate::ConfidenceGate;
pub use types::{
    ConfidenceRecord, DraftMessage, Feedback, GateDecision, ReviewDecision, ReviewEvent, Situation,
};
