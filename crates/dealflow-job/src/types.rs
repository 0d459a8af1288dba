//! Job types and value objects.

use std::fmt;

use dealflow_core::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Kinds of long-running work the assistant can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    ExtractFacts,
    SellerReport,
    OfferPacket,
    EsignEnvelope,
}

impl JobType {
    /// Static display/policy configuration for this job type.
    pub fn config(&self) -> &'static JobTypeConfig {
        match self {
            JobType::ExtractFacts => &JobTypeConfig {
                label: "Extract facts",
                description: "Pull structured facts from call notes and documents",
                estimated_secs: 30,
                cancellable: true,
            },
            JobType::SellerReport => &JobTypeConfig {
                label: "Seller report",
                description: "Generate a seller-facing valuation report",
                estimated_secs: 90,
                cancellable: true,
            },
            JobType::OfferPacket => &JobTypeConfig {
                label: "Offer packet",
                description: "Assemble the offer document packet",
                estimated_secs: 120,
                cancellable: true,
            },
            // Envelope preparation touches the e-sign provider; once started
            // it must run to a terminal state.
            JobType::EsignEnvelope => &JobTypeConfig {
                label: "E-sign envelope",
                description: "Prepare an e-signature envelope for the offer",
                estimated_secs: 60,
                cancellable: false,
            },
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobType::ExtractFacts => write!(f, "extract_facts"),
            JobType::SellerReport => write!(f, "seller_report"),
            JobType::OfferPacket => write!(f, "offer_packet"),
            JobType::EsignEnvelope => write!(f, "esign_envelope"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extract_facts" => Ok(JobType::ExtractFacts),
            "seller_report" => Ok(JobType::SellerReport),
            "offer_packet" => Ok(JobType::OfferPacket),
            "esign_envelope" => Ok(JobType::EsignEnvelope),
            _ => Err(format!("Unknown job type: {}", s)),
        }
    }
}

/// Job lifecycle states.
///
/// `Succeeded`, `Failed`, and `Cancelled` are terminal and absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "succeeded" => Ok(JobStatus::Succeeded),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" => Ok(JobStatus::Cancelled),
            _ => Err(format!("Unknown job status: {}", s)),
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// Static configuration attached to a job type.
///
/// `cancellable` is display/business policy for UI surfaces; the watcher
/// itself places no restriction on cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTypeConfig {
    pub label: &'static str,
    pub description: &'static str,
    pub estimated_secs: u64,
    pub cancellable: bool,
}

/// A tracked asynchronous unit of work, as reported by the job runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub deal_id: Option<Uuid>,
    pub job_type: JobType,
    pub status: JobStatus,
    /// Percent complete, 0-100.
    pub progress: u8,
    pub input: Option<serde_json::Value>,
    pub result: Option<serde_json::Value>,
    /// References to produced artifacts (document ids, storage keys).
    pub artifacts: Vec<String>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// A request to submit a long-running job, as produced by action handlers.
///
/// Submission itself is the job runner's concern; handlers only describe
/// the work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub job_type: JobType,
    pub deal_id: Option<Uuid>,
    pub input: serde_json::Value,
}

// =============================================================================
// Tests
// =============================================================================
