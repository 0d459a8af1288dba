//! Underwriting assumption update handler.

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::patchset::build_assumption_update;
use crate::types::{ActionId, ActionInput, HandlerContext, HandlerPayload};

pub struct UpdateAssumptionHandler;

impl ActionHandler for UpdateAssumptionHandler {
    fn action_id(&self) -> ActionId {
        ActionId::UpdateAssumption
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let field = input
            .str_param("field")
            .ok_or_else(|| ActionError::missing_field("field"))?;
        let value = input
            .params
            .get("value")
            .cloned()
            .ok_or_else(|| ActionError::missing_field("value"))?;
        let evidence = input.str_param("evidence").map(|s| s.to_string());

        // The deal snapshot carries the current assumption for the
        // before/after pair; absent means the assumption is being set for
        // the first time.
        let before = ctx.deal.assumptions.get(field).cloned();

        Ok(HandlerPayload::Patch(build_assumption_update(
            ctx.deal.id,
            field,
            before,
            value,
            evidence,
        )))
    }
}
