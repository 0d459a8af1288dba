//! PatchSet: an immutable batch of proposed record mutations.
//!
//! A PatchSet is built up through appenders that return a new value and
//! leave the input untouched, so earlier versions stay valid for preview
//! and undo diffing. Nothing here touches the record store; application is
//! the repository's job (see `repository.rs`).

use dealflow_core::{Confidence, DealStage, EntityKind, TimelineEventKind, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ActionError;
use crate::types::ActionId;

/// Maximum characters of note text carried into a timeline title.
const NOTE_TITLE_MAX: usize = 50;

// =============================================================================
// Value Objects
// =============================================================================

/// Kind of record mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

/// One proposed mutation against a record entity.
///
/// `rationale` is mandatory: every mutation must justify itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: OpKind,
    pub entity: EntityKind,
    /// Required for update/delete; absent for create.
    pub entity_id: Option<Uuid>,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub rationale: String,
    /// Optional evidence/source reference backing the change.
    pub evidence: Option<String>,
    /// Dotted path for partial updates, e.g. `assumptions.arv`.
    pub field_path: Option<String>,
}

/// A timeline entry that will be created once the PatchSet applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTimelineEvent {
    pub kind: TimelineEventKind,
    pub title: String,
    pub description: Option<String>,
}

/// An immutable, named batch of proposed mutations plus the timeline
/// entries they will generate.
///
/// Immutable after construction except the applied/applied_at transition,
/// which happens exactly once, via [`PatchSet::mark_applied`], called only
/// by the apply-executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchSet {
    pub id: Uuid,
    pub summary: String,
    pub confidence: Confidence,
    pub action_id: Option<ActionId>,
    pub deal_id: Option<Uuid>,
    pub ops: Vec<PatchOperation>,
    pub timeline: Vec<PendingTimelineEvent>,
    pub created_at: Timestamp,
    pub applied: bool,
    pub applied_at: Option<Timestamp>,
}

/// Optional fields for a fresh PatchSet.
#[derive(Debug, Clone, Default)]
pub struct PatchSetOptions {
    pub confidence: Option<Confidence>,
    pub action_id: Option<ActionId>,
    pub deal_id: Option<Uuid>,
}

/// Generate a fresh PatchSet id. Random v4: collision probability is
/// cryptographically negligible across the process lifetime.
pub fn generate_patchset_id() -> Uuid {
    Uuid::new_v4()
}

impl PatchSet {
    /// Create an empty PatchSet. Confidence defaults to `Med`.
    pub fn new(summary: impl Into<String>, options: PatchSetOptions) -> Self {
        Self {
            id: generate_patchset_id(),
            summary: summary.into(),
            confidence: options.confidence.unwrap_or(Confidence::Med),
            action_id: options.action_id,
            deal_id: options.deal_id,
            ops: Vec::new(),
            timeline: Vec::new(),
            created_at: Timestamp::now(),
            applied: false,
            applied_at: None,
        }
    }

    /// Return a new PatchSet with the operation appended. `self` is
    /// unchanged.
    pub fn with_operation(&self, op: PatchOperation) -> Self {
        let mut next = self.clone();
        next.ops.push(op);
        next
    }

    /// Return a new PatchSet with the timeline event appended. `self` is
    /// unchanged.
    pub fn with_timeline_event(&self, event: PendingTimelineEvent) -> Self {
        let mut next = self.clone();
        next.timeline.push(event);
        next
    }

    /// Record successful application. Succeeds exactly once; a second call
    /// is an error. Reserved for the apply-executor.
    pub fn mark_applied(&mut self, at: Timestamp) -> Result<(), ActionError> {
        if self.applied {
            return Err(ActionError::Patch(format!(
                "PatchSet {} is already applied",
                self.id
            )));
        }
        self.applied = true;
        self.applied_at = Some(at);
        Ok(())
    }
}

// =============================================================================
// Domain Builders
// =============================================================================

/// One stage-update operation plus its `stage_change` timeline event.
pub fn build_stage_update(
    deal_id: Uuid,
    from: DealStage,
    to: DealStage,
    rationale: impl Into<String>,
) -> PatchSet {
    let rationale = rationale.into();
    PatchSet::new(
        format!("Move deal to {}", to),
        PatchSetOptions {
            action_id: Some(ActionId::UpdateStage),
            deal_id: Some(deal_id),
            ..PatchSetOptions::default()
        },
    )
    .with_operation(PatchOperation {
        op: OpKind::Update,
        entity: EntityKind::Deal,
        entity_id: Some(deal_id),
        before: Some(serde_json::json!({ "stage": from })),
        after: Some(serde_json::json!({ "stage": to })),
        rationale: rationale.clone(),
        evidence: None,
        field_path: Some("stage".to_string()),
    })
    .with_timeline_event(PendingTimelineEvent {
        kind: TimelineEventKind::StageChange,
        title: format!("Stage: {} \u{2192} {}", from, to),
        description: Some(rationale),
    })
}

/// One assumption-update operation with a recorded before/after pair.
pub fn build_assumption_update(
    deal_id: Uuid,
    field: &str,
    before: Option<serde_json::Value>,
    after: serde_json::Value,
    evidence: Option<String>,
) -> PatchSet {
    let keyed = |v: serde_json::Value| {
        let mut m = serde_json::Map::new();
        m.insert(field.to_string(), v);
        serde_json::Value::Object(m)
    };
    PatchSet::new(
        format!("Update assumption '{}'", field),
        PatchSetOptions {
            action_id: Some(ActionId::UpdateAssumption),
            deal_id: Some(deal_id),
            ..PatchSetOptions::default()
        },
    )
    .with_operation(PatchOperation {
        op: OpKind::Update,
        entity: EntityKind::DealAssumption,
        entity_id: Some(deal_id),
        before: before.map(keyed),
        after: Some(keyed(after)),
        rationale: format!("Set assumption '{}'", field),
        evidence,
        field_path: Some(format!("assumptions.{}", field)),
    })
    .with_timeline_event(PendingTimelineEvent {
        kind: TimelineEventKind::AssumptionUpdated,
        title: format!("Assumption '{}' updated", field),
        description: None,
    })
}

/// One note creation plus its `note_added` timeline event.
///
/// The timeline title carries at most [`NOTE_TITLE_MAX`] characters of the
/// note, with an ellipsis when truncated; the full text is preserved in the
/// operation rationale.
pub fn build_add_note(deal_id: Uuid, text: &str) -> PatchSet {
    let title = if text.chars().count() > NOTE_TITLE_MAX {
        let truncated: String = text.chars().take(NOTE_TITLE_MAX).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    };

    PatchSet::new(
        "Add note".to_string(),
        PatchSetOptions {
            action_id: Some(ActionId::AddNote),
            deal_id: Some(deal_id),
            ..PatchSetOptions::default()
        },
    )
    .with_operation(PatchOperation {
        op: OpKind::Create,
        entity: EntityKind::Deal,
        entity_id: Some(deal_id),
        before: None,
        after: Some(serde_json::json!({ "note": text })),
        rationale: text.to_string(),
        evidence: None,
        field_path: None,
    })
    .with_timeline_event(PendingTimelineEvent {
        kind: TimelineEventKind::NoteAdded,
        title,
        description: Some(text.to_string()),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_op() -> PatchOperation {
        PatchOperation {
            op: OpKind::Update,
            entity: EntityKind::Deal,
            entity_id: Some(Uuid::new_v4()),
            before: Some(serde_json::json!({"stage": "new"})),
            after: Some(serde_json::json!({"stage": "contacted"})),
            rationale: "Seller picked up".to_string(),
            evidence: None,
            field_path: Some("stage".to_string()),
        }
    }

    // ---- id generation ----

    #[test]
    fn test_generate_patchset_id_unique_100() {
        use std::collections::HashSet;
        let ids: HashSet<Uuid> = (0..100).map(|_| generate_patchset_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ---- construction ----

    #[test]
    fn test_new_defaults() {
        let ps = PatchSet::new("Empty", PatchSetOptions::default());
        assert_eq!(ps.summary, "Empty");
        assert_eq!(ps.confidence, Confidence::Med);
        assert!(ps.action_id.is_none());
        assert!(ps.ops.is_empty());
        assert!(ps.timeline.is_empty());
        assert!(!ps.applied);
        assert!(ps.applied_at.is_none());
    }

    #[test]
    fn test_new_with_confidence_override() {
        let ps = PatchSet::new(
            "Confident",
            PatchSetOptions {
                confidence: Some(Confidence::High),
                ..PatchSetOptions::default()
            },
        );
        assert_eq!(ps.confidence, Confidence::High);
    }

    // ---- immutability ----

    #[test]
    fn test_with_operation_leaves_input_unchanged() {
        let base = PatchSet::new("Base", PatchSetOptions::default());
        let one = base.with_operation(sample_op());
        let two = one.with_operation(sample_op());

        assert_eq!(base.ops.len(), 0);
        assert_eq!(one.ops.len(), 1);
        assert_eq!(two.ops.len(), 2);
        // Shared identity and metadata carry over.
        assert_eq!(base.id, two.id);
        assert_eq!(base.created_at, two.created_at);
    }

    #[test]
    fn test_with_timeline_event_leaves_input_unchanged() {
        let base = PatchSet::new("Base", PatchSetOptions::default());
        let event = PendingTimelineEvent {
            kind: TimelineEventKind::NoteAdded,
            title: "Note".to_string(),
            description: None,
        };
        let one = base.with_timeline_event(event.clone());
        let two = one.with_timeline_event(event);

        assert_eq!(base.timeline.len(), 0);
        assert_eq!(one.timeline.len(), 1);
        assert_eq!(two.timeline.len(), 2);
    }

    #[test]
    fn test_accumulation_preserves_call_order() {
        let mut ps = PatchSet::new("Ordered", PatchSetOptions::default());
        for i in 0..4 {
            let mut op = sample_op();
            op.rationale = format!("op {}", i);
            ps = ps.with_operation(op);
        }
        let rationales: Vec<&str> = ps.ops.iter().map(|o| o.rationale.as_str()).collect();
        assert_eq!(rationales, vec!["op 0", "op 1", "op 2", "op 3"]);
    }

    // ---- applied transition ----

    #[test]
    fn test_mark_applied_exactly_once() {
        let mut ps = PatchSet::new("Apply me", PatchSetOptions::default());
        let at = Timestamp::now();
        ps.mark_applied(at).unwrap();
        assert!(ps.applied);
        assert_eq!(ps.applied_at, Some(at));

        let err = ps.mark_applied(Timestamp::now()).unwrap_err();
        assert!(err.to_string().contains("already applied"));
    }

    // ---- build_stage_update ----

    #[test]
    fn test_build_stage_update_shape() {
        let deal_id = Uuid::new_v4();
        let ps = build_stage_update(
            deal_id,
            DealStage::New,
            DealStage::Contacted,
            "Seller answered",
        );

        assert_eq!(ps.ops.len(), 1);
        assert_eq!(ps.timeline.len(), 1);

        let op = &ps.ops[0];
        assert_eq!(op.op, OpKind::Update);
        assert_eq!(op.entity, EntityKind::Deal);
        assert_eq!(op.before, Some(serde_json::json!({"stage": "new"})));
        assert_eq!(op.after, Some(serde_json::json!({"stage": "contacted"})));

        assert_eq!(ps.timeline[0].kind, TimelineEventKind::StageChange);
        assert_eq!(ps.action_id, Some(ActionId::UpdateStage));
        assert_eq!(ps.deal_id, Some(deal_id));
    }

    // ---- build_assumption_update ----

    #[test]
    fn test_build_assumption_update_records_before_after() {
        let deal_id = Uuid::new_v4();
        let ps = build_assumption_update(
            deal_id,
            "arv",
            Some(serde_json::json!(280000.0)),
            serde_json::json!(300000.0),
            Some("comp report #4".to_string()),
        );

        assert_eq!(ps.ops.len(), 1);
        let op = &ps.ops[0];
        assert_eq!(op.entity, EntityKind::DealAssumption);
        assert_eq!(op.before, Some(serde_json::json!({"arv": 280000.0})));
        assert_eq!(op.after, Some(serde_json::json!({"arv": 300000.0})));
        assert_eq!(op.evidence.as_deref(), Some("comp report #4"));
        assert_eq!(op.field_path.as_deref(), Some("assumptions.arv"));
        assert_eq!(ps.timeline[0].kind, TimelineEventKind::AssumptionUpdated);
    }

    #[test]
    fn test_build_assumption_update_no_prior_value() {
        let ps = build_assumption_update(
            Uuid::new_v4(),
            "repair_cost",
            None,
            serde_json::json!(45000.0),
            None,
        );
        assert!(ps.ops[0].before.is_none());
    }

    // ---- build_add_note ----

    #[test]
    fn test_add_note_short_title_untruncated() {
        let ps = build_add_note(Uuid::new_v4(), "Quick note");
        assert_eq!(ps.timeline[0].title, "Quick note");
    }

    #[test]
    fn test_add_note_long_title_truncated() {
        let text = "A".repeat(100);
        let ps = build_add_note(Uuid::new_v4(), &text);

        let title = &ps.timeline[0].title;
        assert!(title.chars().count() <= 53);
        assert!(title.ends_with("..."));
        // Full text preserved in the rationale.
        assert_eq!(ps.ops[0].rationale, text);
    }

    #[test]
    fn test_add_note_exactly_50_chars_untruncated() {
        let text = "B".repeat(50);
        let ps = build_add_note(Uuid::new_v4(), &text);
        assert_eq!(ps.timeline[0].title, text);
    }

    #[test]
    fn test_add_note_shape() {
        let deal_id = Uuid::new_v4();
        let ps = build_add_note(deal_id, "Seller wants to close by June");
        assert_eq!(ps.ops.len(), 1);
        assert_eq!(ps.ops[0].op, OpKind::Create);
        assert_eq!(ps.timeline.len(), 1);
        assert_eq!(ps.timeline[0].kind, TimelineEventKind::NoteAdded);
        assert_eq!(ps.action_id, Some(ActionId::AddNote));
    }

    // ---- serde ----

    #[test]
    fn test_patchset_serde_round_trip() {
        let ps = build_stage_update(
            Uuid::new_v4(),
            DealStage::Contacted,
            DealStage::Appointment,
            "Walkthrough booked",
        );
        let json = serde_json::to_string(&ps).unwrap();
        let rt: PatchSet = serde_json::from_str(&json).unwrap();
        assert_eq!(ps.id, rt.id);
        assert_eq!(rt.ops.len(), 1);
        assert_eq!(rt.timeline.len(), 1);
        assert!(!rt.applied);
    }
}
