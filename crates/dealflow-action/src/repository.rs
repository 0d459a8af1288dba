//! Record repository seam and the PatchSet apply-executor.
//!
//! The repository trait is the only surface through which proposed
//! mutations reach the record store. `apply_patch_set` is the sole caller
//! of [`PatchSet::mark_applied`]: a PatchSet is marked applied only after
//! the store reports every operation landed.

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use dealflow_core::{Deal, DealflowError, Property, Timestamp};

use crate::error::ActionError;
use crate::patchset::PatchSet;

/// What the record store did with one PatchSet.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub applied_ops: usize,
    pub failed_ops: usize,
    /// Timeline entries created from the PatchSet's pending events.
    pub created_timeline_ids: Vec<Uuid>,
    pub updated_entity_ids: Vec<Uuid>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failed_ops == 0
    }
}

/// Access to deal records and the mutation path for PatchSets.
///
/// Implementations own atomicity: `apply` either lands the whole batch or
/// reports which operations failed, never silently drops one.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn fetch_deal(&self, id: Uuid) -> Result<Deal, DealflowError>;

    async fn fetch_property(&self, id: Uuid) -> Result<Property, DealflowError>;

    /// Apply every operation and pending timeline event in the PatchSet.
    /// Must not mutate the PatchSet itself.
    async fn apply(&self, patch: &PatchSet) -> Result<ApplyReport, DealflowError>;
}

/// Apply a PatchSet through the repository and record the applied
/// transition on success.
///
/// A PatchSet that is already applied is rejected before touching the
/// store. Partial failure leaves the PatchSet unapplied so it can be
/// retried or discarded with its audit trail intact.
pub async fn apply_patch_set(
    repo: &dyn RecordRepository,
    patch: &mut PatchSet,
) -> Result<ApplyReport, ActionError> {
    if patch.applied {
        return Err(ActionError::Patch(format!(
            "PatchSet {} is already applied",
            patch.id
        )));
    }

    let report = repo
        .apply(patch)
        .await
        .map_err(|e| ActionError::Patch(e.to_string()))?;

    if report.is_clean() {
        patch.mark_applied(Timestamp::now())?;
        info!(
            patchset_id = %patch.id,
            ops = report.applied_ops,
            timeline = report.created_timeline_ids.len(),
            "PatchSet applied"
        );
    } else {
        warn!(
            patchset_id = %patch.id,
            failed = report.failed_ops,
            "PatchSet partially failed; left unapplied"
        );
    }

    Ok(report)
}
