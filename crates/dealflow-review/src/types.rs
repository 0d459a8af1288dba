use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use dealflow_core::Timestamp;

// =============================================================================
// Enums
// =============================================================================

/// Conversation situation a draft message was written for.
///
/// The situation selects the auto-send policy; an unrecognized label maps to
/// `Unknown`, which never auto-sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    ColdLead,
    WarmLead,
    Negotiating,
    UnderContract,
    Unknown,
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Situation::ColdLead => "cold_lead",
            Situation::WarmLead => "warm_lead",
            Situation::Negotiating => "negotiating",
            Situation::UnderContract => "under_contract",
            Situation::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Situation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cold_lead" => Ok(Situation::ColdLead),
            "warm_lead" => Ok(Situation::WarmLead),
            "negotiating" => Ok(Situation::Negotiating),
            "under_contract" => Ok(Situation::UnderContract),
            "unknown" => Ok(Situation::Unknown),
            _ => Err(format!("Unknown situation: {}", s)),
        }
    }
}

/// Outcome of the confidence gate for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum GateDecision {
    AutoSend,
    /// The reason the draft was routed to review.
    NeedsReview(String),
}

/// Reviewer verdict on a queued draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

/// Optional reviewer signal on draft quality, separate from the
/// send/don't-send verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Helpful,
    NotHelpful,
}

// =============================================================================
// Structs
// =============================================================================

/// An assistant-drafted outbound message awaiting the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftMessage {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub situation: Situation,
    /// Internal 0-1 confidence scale.
    pub confidence: f32,
    pub body: String,
}

impl DraftMessage {
    pub fn new(
        deal_id: Uuid,
        situation: Situation,
        confidence: f32,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            deal_id,
            situation,
            confidence,
            body: body.into(),
        }
    }
}

/// The confidence comparison the gate performed, kept for audit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceRecord {
    pub confidence: f32,
    pub situation: Situation,
    /// The 0-1 threshold that was in effect.
    pub threshold: f32,
}

/// A resolved review, forwarded to the calibrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub message_id: Uuid,
    pub situation: Situation,
    pub confidence: f32,
    pub threshold: f32,
    pub decision: ReviewDecision,
    pub feedback: Option<Feedback>,
    pub decided_at: Timestamp,
}

// =============================================================================
// Tests
// =============================================================================
