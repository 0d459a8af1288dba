//! Core types and value objects for the action engine.
//!
//! Defines action ids, handler inputs/outputs, and their supporting
//! enumerations.

use std::fmt;

use dealflow_core::{Deal, Property};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patchset::PatchSet;
use dealflow_job::JobRequest;

// =============================================================================
// Enums
// =============================================================================

/// The closed set of actions the assistant can propose.
///
/// Dispatch is total over this set: every variant maps to exactly one
/// handler. Strings outside the set fail `FromStr`, which is the
/// dispatcher's "Unknown action" path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    UpdateStage,
    SetNextAction,
    CreateTask,
    AddNote,
    UnderwriteCheck,
    UpdateAssumption,
    ExtractFacts,
    GenerateSellerReport,
    GenerateOfferPacket,
    PrepareEsignEnvelope,
    DraftCounterText,
    DataQualityCheck,
}

impl ActionId {
    pub const ALL: [ActionId; 12] = [
        ActionId::UpdateStage,
        ActionId::SetNextAction,
        ActionId::CreateTask,
        ActionId::AddNote,
        ActionId::UnderwriteCheck,
        ActionId::UpdateAssumption,
        ActionId::ExtractFacts,
        ActionId::GenerateSellerReport,
        ActionId::GenerateOfferPacket,
        ActionId::PrepareEsignEnvelope,
        ActionId::DraftCounterText,
        ActionId::DataQualityCheck,
    ];
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::UpdateStage => write!(f, "update_stage"),
            ActionId::SetNextAction => write!(f, "set_next_action"),
            ActionId::CreateTask => write!(f, "create_task"),
            ActionId::AddNote => write!(f, "add_note"),
            ActionId::UnderwriteCheck => write!(f, "underwrite_check"),
            ActionId::UpdateAssumption => write!(f, "update_assumption"),
            ActionId::ExtractFacts => write!(f, "extract_facts"),
            ActionId::GenerateSellerReport => write!(f, "generate_seller_report"),
            ActionId::GenerateOfferPacket => write!(f, "generate_offer_packet"),
            ActionId::PrepareEsignEnvelope => write!(f, "prepare_esign_envelope"),
            ActionId::DraftCounterText => write!(f, "draft_counter_text"),
            ActionId::DataQualityCheck => write!(f, "data_quality_check"),
        }
    }
}

impl std::str::FromStr for ActionId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update_stage" => Ok(ActionId::UpdateStage),
            "set_next_action" => Ok(ActionId::SetNextAction),
            "create_task" => Ok(ActionId::CreateTask),
            "add_note" => Ok(ActionId::AddNote),
            "underwrite_check" => Ok(ActionId::UnderwriteCheck),
            "update_assumption" => Ok(ActionId::UpdateAssumption),
            "extract_facts" => Ok(ActionId::ExtractFacts),
            "generate_seller_report" => Ok(ActionId::GenerateSellerReport),
            "generate_offer_packet" => Ok(ActionId::GenerateOfferPacket),
            "prepare_esign_envelope" => Ok(ActionId::PrepareEsignEnvelope),
            "draft_counter_text" => Ok(ActionId::DraftCounterText),
            "data_quality_check" => Ok(ActionId::DataQualityCheck),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// Catalog category of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    RecordUpdate,
    Analysis,
    Offer,
    Document,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::RecordUpdate => write!(f, "record_update"),
            ActionCategory::Analysis => write!(f, "analysis"),
            ActionCategory::Offer => write!(f, "offer"),
            ActionCategory::Document => write!(f, "document"),
        }
    }
}

/// Recommendation ("next best action") categories an action can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NbaCategory {
    FollowUp,
    Analysis,
    Offer,
    Documents,
    DataQuality,
}

// =============================================================================
// Handler Input / Output
// =============================================================================

/// One action invocation. Created per call; never persisted.
///
/// The action id travels separately (as a string) into the dispatcher so
/// unknown ids stay representable. `params` carries the action-specific
/// fields; each handler validates its own, the dispatcher does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionInput {
    pub deal_id: Uuid,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl ActionInput {
    pub fn new(deal_id: Uuid) -> Self {
        Self {
            deal_id,
            params: serde_json::Map::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: serde_json::Value) -> Self {
        self.params.insert(key.to_string(), value);
        self
    }

    /// String param, `None` when absent or empty.
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn f64_param(&self, key: &str) -> Option<f64> {
        self.params.get(key).and_then(|v| v.as_f64())
    }
}

/// Read-only snapshot supplied to every handler invocation.
///
/// Supplied fresh per call; handlers must not mutate it and retain no state
/// between invocations.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub deal: Deal,
    pub property: Option<Property>,
    pub user_id: Uuid,
}

/// Structured inline content returned by advisory handlers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineContent {
    pub text: String,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub recommendation: Option<String>,
}

impl InlineContent {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// What a successful handler produced: exactly one of a PatchSet, a job
/// submission request, or inline content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerPayload {
    Patch(PatchSet),
    Job(JobRequest),
    Content(InlineContent),
}

/// Normalized outcome of dispatching an action.
///
/// On success exactly one payload is present; on failure only `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub payload: Option<HandlerPayload>,
    pub error: Option<String>,
}

impl ActionOutcome {
    pub fn ok(payload: HandlerPayload) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
