//! Action dispatcher.
//!
//! Routes an action id to its handler through a fixed registry built once
//! at startup. The dispatcher is the single boundary that guarantees every
//! outcome is a well-formed [`ActionOutcome`]: handler errors are
//! normalized, never propagated.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::ActionError;
use crate::handler::{
    assumption::UpdateAssumptionHandler,
    counter::DraftCounterTextHandler,
    documents::{
        ExtractFactsHandler, GenerateOfferPacketHandler, GenerateSellerReportHandler,
        PrepareEsignEnvelopeHandler,
    },
    follow_up::{AddNoteHandler, CreateTaskHandler, SetNextActionHandler},
    stage::UpdateStageHandler,
    underwrite::{DataQualityCheckHandler, UnderwriteCheckHandler},
    ActionHandler,
};
use crate::types::{ActionId, ActionInput, ActionOutcome, HandlerContext};

fn registry() -> &'static HashMap<ActionId, Box<dyn ActionHandler>> {
    static REGISTRY: OnceLock<HashMap<ActionId, Box<dyn ActionHandler>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let handlers: Vec<Box<dyn ActionHandler>> = vec![
            Box::new(UpdateStageHandler),
            Box::new(SetNextActionHandler),
            Box::new(CreateTaskHandler),
            Box::new(AddNoteHandler),
            Box::new(UnderwriteCheckHandler),
            Box::new(DataQualityCheckHandler),
            Box::new(UpdateAssumptionHandler),
            Box::new(ExtractFactsHandler),
            Box::new(GenerateSellerReportHandler),
            Box::new(GenerateOfferPacketHandler),
            Box::new(PrepareEsignEnvelopeHandler),
            Box::new(DraftCounterTextHandler),
        ];
        handlers.into_iter().map(|h| (h.action_id(), h)).collect()
    })
}

/// True iff a handler exists for the given action id string.
///
/// Pure existence check; UI surfaces use it to decide whether to offer an
/// action at all.
pub fn has_handler(action: &str) -> bool {
    match action.parse::<ActionId>() {
        Ok(id) => registry().contains_key(&id),
        Err(_) => false,
    }
}

/// Dispatch one action invocation to its handler.
///
/// Unknown ids fail with a message containing "Unknown action". A handler
/// error becomes a failed outcome carrying the error's message.
pub fn execute_action(action: &str, input: &ActionInput, ctx: &HandlerContext) -> ActionOutcome {
    let id = match action.parse::<ActionId>() {
        Ok(id) => id,
        Err(msg) => return ActionOutcome::failed(msg),
    };

    let Some(handler) = registry().get(&id) else {
        // Unreachable while the registry covers every ActionId, but the
        // contract is a failed result, not a panic.
        return ActionOutcome::failed(ActionError::UnknownAction(action.to_string()).to_string());
    };

    debug!(action = %id, deal_id = %input.deal_id, "Dispatching action");
    match handler.handle(input, ctx) {
        Ok(payload) => ActionOutcome::ok(payload),
        Err(e) => ActionOutcome::failed(e.to_string()),
    }
}
