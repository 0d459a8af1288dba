//! Follow-up handlers: set next action, create task, add note.
//!
//! Each requires its primary text field and produces a single operation
//! plus, where relevant, one timeline event.

use dealflow_core::{EntityKind, TimelineEventKind};

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::patchset::{
    build_add_note, OpKind, PatchOperation, PatchSet, PatchSetOptions, PendingTimelineEvent,
};
use crate::types::{ActionId, ActionInput, HandlerContext, HandlerPayload};

pub struct SetNextActionHandler;

impl ActionHandler for SetNextActionHandler {
    fn action_id(&self) -> ActionId {
        ActionId::SetNextAction
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let next_action = input
            .str_param("next_action")
            .ok_or_else(|| ActionError::missing_field("next_action"))?;

        let ps = PatchSet::new(
            "Set next action",
            PatchSetOptions {
                action_id: Some(ActionId::SetNextAction),
                deal_id: Some(ctx.deal.id),
                ..PatchSetOptions::default()
            },
        )
        .with_operation(PatchOperation {
            op: OpKind::Update,
            entity: EntityKind::Deal,
            entity_id: Some(ctx.deal.id),
            before: ctx
                .deal
                .next_action
                .as_ref()
                .map(|prev| serde_json::json!({ "next_action": prev })),
            after: Some(serde_json::json!({ "next_action": next_action })),
            rationale: format!("Next action: {}", next_action),
            evidence: None,
            field_path: Some("next_action".to_string()),
        })
        .with_timeline_event(PendingTimelineEvent {
            kind: TimelineEventKind::NextActionSet,
            title: format!("Next: {}", next_action),
            description: None,
        });

        Ok(HandlerPayload::Patch(ps))
    }
}

pub struct CreateTaskHandler;

impl ActionHandler for CreateTaskHandler {
    fn action_id(&self) -> ActionId {
        ActionId::CreateTask
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let title = input
            .str_param("title")
            .ok_or_else(|| ActionError::missing_field("title"))?;
        let due = input.str_param("due");

        let ps = PatchSet::new(
            format!("Create task: {}", title),
            PatchSetOptions {
                action_id: Some(ActionId::CreateTask),
                deal_id: Some(ctx.deal.id),
                ..PatchSetOptions::default()
            },
        )
        .with_operation(PatchOperation {
            op: OpKind::Create,
            entity: EntityKind::Task,
            entity_id: None,
            before: None,
            after: Some(serde_json::json!({
                "title": title,
                "deal_id": ctx.deal.id,
                "due": due,
                "assignee": ctx.user_id,
            })),
            rationale: format!("Task created: {}", title),
            evidence: None,
            field_path: None,
        })
        .with_timeline_event(PendingTimelineEvent {
            kind: TimelineEventKind::TaskCreated,
            title: format!("Task: {}", title),
            description: due.map(|d| format!("Due {}", d)),
        });

        Ok(HandlerPayload::Patch(ps))
    }
}

pub struct AddNoteHandler;

impl ActionHandler for AddNoteHandler {
    fn action_id(&self) -> ActionId {
        ActionId::AddNote
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let text = input
            .str_param("text")
            .ok_or_else(|| ActionError::missing_field("text"))?;

        Ok(HandlerPayload::Patch(build_add_note(ctx.deal.id, text)))
    }
}
