//! Stage update handler.
//!
//! Moves a deal along the pipeline. With no target stage supplied, the
//! first entry of the stage graph's successors is auto-suggested. A target
//! outside the standard successors still succeeds; the rationale is marked
//! so reviewers can see the shortcut.

use dealflow_core::DealStage;

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::patchset::build_stage_update;
use crate::types::{ActionId, ActionInput, HandlerContext, HandlerPayload};

pub struct UpdateStageHandler;

impl ActionHandler for UpdateStageHandler {
    fn action_id(&self) -> ActionId {
        ActionId::UpdateStage
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let current = ctx.deal.stage;
        let successors = current.next_stages();

        let target = match input.str_param("to_stage") {
            Some(raw) => raw
                .parse::<DealStage>()
                .map_err(ActionError::Validation)?,
            None => *successors.first().ok_or_else(|| {
                ActionError::Precondition(format!(
                    "Deal is at terminal stage '{}'; no next stage to suggest",
                    current
                ))
            })?,
        };

        let mut rationale = input
            .str_param("rationale")
            .unwrap_or("Stage updated by assistant")
            .to_string();

        // Deliberate escape hatch: off-graph transitions are allowed, just
        // flagged in the rationale.
        if !successors.contains(&target) {
            rationale.push_str(" (non-standard transition)");
        }

        Ok(HandlerPayload::Patch(build_stage_update(
            ctx.deal.id,
            current,
            target,
            rationale,
        )))
    }
}
