use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Pipeline stage of a deal.
///
/// The stage graph is linear from `New` through `Closed`; `Dead` is reachable
/// from every non-terminal stage. `Closed` and `Dead` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    New,
    Contacted,
    Appointment,
    OfferSent,
    UnderContract,
    Closed,
    Dead,
}

impl DealStage {
    /// Standard forward transitions from this stage.
    ///
    /// Terminal stages (`Closed`, `Dead`) have no successors. The first entry
    /// is the conventional "next" stage used for auto-suggestion.
    pub fn next_stages(&self) -> &'static [DealStage] {
        match self {
            DealStage::New => &[DealStage::Contacted, DealStage::Dead],
            DealStage::Contacted => &[DealStage::Appointment, DealStage::Dead],
            DealStage::Appointment => &[DealStage::OfferSent, DealStage::Dead],
            DealStage::OfferSent => &[DealStage::UnderContract, DealStage::Dead],
            DealStage::UnderContract => &[DealStage::Closed, DealStage::Dead],
            DealStage::Closed => &[],
            DealStage::Dead => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_stages().is_empty()
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealStage::New => write!(f, "new"),
            DealStage::Contacted => write!(f, "contacted"),
            DealStage::Appointment => write!(f, "appointment"),
            DealStage::OfferSent => write!(f, "offer_sent"),
            DealStage::UnderContract => write!(f, "under_contract"),
            DealStage::Closed => write!(f, "closed"),
            DealStage::Dead => write!(f, "dead"),
        }
    }
}

impl std::str::FromStr for DealStage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(DealStage::New),
            "contacted" => Ok(DealStage::Contacted),
            "appointment" => Ok(DealStage::Appointment),
            "offer_sent" => Ok(DealStage::OfferSent),
            "under_contract" => Ok(DealStage::UnderContract),
            "closed" => Ok(DealStage::Closed),
            "dead" => Ok(DealStage::Dead),
            _ => Err(format!("Unknown deal stage: {}", s)),
        }
    }
}

/// Subscription plan tier. Ordering matters: `Starter < Pro < Elite`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Starter,
    Pro,
    Elite,
}

impl PlanTier {
    /// True if this tier meets or exceeds the required tier.
    pub fn meets(&self, required: PlanTier) -> bool {
        *self >= required
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::Starter => write!(f, "starter"),
            PlanTier::Pro => write!(f, "pro"),
            PlanTier::Elite => write!(f, "elite"),
        }
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(PlanTier::Starter),
            "pro" => Ok(PlanTier::Pro),
            "elite" => Ok(PlanTier::Elite),
            _ => Err(format!("Unknown plan tier: {}", s)),
        }
    }
}

/// Record entity kinds a patch operation may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Deal,
    DealOffer,
    DealAssumption,
    DealEvidence,
    DealWalkthrough,
    Property,
    Lead,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Deal => write!(f, "deal"),
            EntityKind::DealOffer => write!(f, "deal_offer"),
            EntityKind::DealAssumption => write!(f, "deal_assumption"),
            EntityKind::DealEvidence => write!(f, "deal_evidence"),
            EntityKind::DealWalkthrough => write!(f, "deal_walkthrough"),
            EntityKind::Property => write!(f, "property"),
            EntityKind::Lead => write!(f, "lead"),
            EntityKind::Task => write!(f, "task"),
        }
    }
}

/// Timeline event taxonomy for deal history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    StageChange,
    NoteAdded,
    TaskCreated,
    NextActionSet,
    AssumptionUpdated,
    OfferDrafted,
    ReportGenerated,
    FactsExtracted,
    EnvelopePrepared,
}

impl fmt::Display for TimelineEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineEventKind::StageChange => write!(f, "stage_change"),
            TimelineEventKind::NoteAdded => write!(f, "note_added"),
            TimelineEventKind::TaskCreated => write!(f, "task_created"),
            TimelineEventKind::NextActionSet => write!(f, "next_action_set"),
            TimelineEventKind::AssumptionUpdated => write!(f, "assumption_updated"),
            TimelineEventKind::OfferDrafted => write!(f, "offer_drafted"),
            TimelineEventKind::ReportGenerated => write!(f, "report_generated"),
            TimelineEventKind::FactsExtracted => write!(f, "facts_extracted"),
            TimelineEventKind::EnvelopePrepared => write!(f, "envelope_prepared"),
        }
    }
}

/// Proposal confidence attached to a PatchSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Med,
    Low,
}

// =============================================================================
// Newtype Wrappers
// =============================================================================

/// Unix timestamp in seconds since epoch.
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Domain Snapshots
// =============================================================================

/// Read-only snapshot of a deal, as supplied to action handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub property_id: Option<Uuid>,
    pub stage: DealStage,
    pub next_action: Option<String>,
    /// Underwriting assumptions keyed by field name.
    pub assumptions: BTreeMap<String, serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Read-only snapshot of a property, as supplied to action handlers.
///
/// Dollar amounts are `None` when the field has not been gathered yet;
/// the underwrite and data-quality checks report on exactly that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub address: String,
    pub arv: Option<f64>,
    pub repair_cost: Option<f64>,
    pub purchase_price: Option<f64>,
}

// =============================================================================
// Tests
// =============================================================================
