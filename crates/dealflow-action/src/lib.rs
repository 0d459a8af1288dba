//! Action engine for Dealflow.
//!
//! Catalogs the assistant's proposable actions, dispatches them to
//! handlers, and models proposed changes as immutable PatchSets pending
//! application by the record repository.

pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod patchset;
pub mod repository;
pub mod types;

pub use catalog::{
    actions_by_category, actions_for_nba_category, actions_for_stage, all_actions,
    can_user_execute, recommended_actions, ActionDefinition, RecommendationContext,
};
pub use dispatch::{execute_action, has_handler};
pub use error::ActionError;
pub use handler::ActionHandler;
pub use patchset::{
    build_add_note, build_assumption_update, build_stage_update, generate_patchset_id, OpKind,
    PatchOperation, PatchSet, PatchSetOptions, PendingTimelineEvent,
};
pub use repository::{apply_patch_set, ApplyReport, RecordRepository};
pub use types::{
    ActionCategory, ActionId, ActionInput, ActionOutcome, HandlerContext, HandlerPayload,
    InlineContent, NbaCategory,
};
