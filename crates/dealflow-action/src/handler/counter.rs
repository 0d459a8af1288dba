//! Counter-offer draft handler.
//!
//! Returns templated inline text. A real language-generation capability is
//! an external collaborator; this handler only shapes the numbers into a
//! reviewable draft.

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{ActionId, ActionInput, HandlerContext, HandlerPayload, InlineContent};

pub struct DraftCounterTextHandler;

impl ActionHandler for DraftCounterTextHandler {
    fn action_id(&self) -> ActionId {
        ActionId::DraftCounterText
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let their_offer = input
            .f64_param("their_offer")
            .ok_or_else(|| ActionError::missing_field("their_offer"))?;

        // Counter target: explicit param, else the deal's own purchase
        // price when one is on file.
        let target = input
            .f64_param("target")
            .or_else(|| ctx.property.as_ref().and_then(|p| p.purchase_price))
            .ok_or_else(|| {
                ActionError::Precondition(
                    "No counter target derivable for this deal".to_string(),
                )
            })?;

        let text = format!(
            "Thanks for the offer of ${:.0}. After reviewing the numbers on this \
             property, the closest we can move is ${:.0}. That figure reflects the \
             current repair scope and comparable sales. Happy to walk through the \
             breakdown if useful.",
            their_offer, target
        );

        Ok(HandlerPayload::Content(InlineContent::text_only(text)))
    }
}
