//! Action handler trait and implementations.
//!
//! One handler per action id. Handlers are pure functions of their
//! arguments: no retained state, no mutation of the context snapshot. They
//! produce exactly one payload kind or a typed error; the dispatcher
//! normalizes errors into the result contract.

pub mod assumption;
pub mod counter;
pub mod documents;
pub mod follow_up;
pub mod stage;
pub mod underwrite;

use crate::error::ActionError;
use crate::types::{ActionId, ActionInput, HandlerContext, HandlerPayload};

/// The function implementing one action's business logic.
pub trait ActionHandler: Send + Sync {
    fn action_id(&self) -> ActionId;

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError>;
}
