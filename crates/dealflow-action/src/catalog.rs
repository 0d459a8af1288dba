//! Static action catalog.
//!
//! One [`ActionDefinition`] per [`ActionId`], built once at process start
//! into an immutable table. There is no runtime registration: extension
//! happens by adding entries here, keeping dispatch provably total over
//! the closed action-id set.

use std::sync::OnceLock;

use dealflow_core::{DealStage, DealflowConfig, PlanTier};
use dealflow_job::JobType;

use crate::types::{ActionCategory, ActionId, NbaCategory};

/// Catalog metadata for one action.
#[derive(Debug, Clone)]
pub struct ActionDefinition {
    pub id: ActionId,
    pub label: &'static str,
    pub description: &'static str,
    pub category: ActionCategory,
    pub requires_confirmation: bool,
    pub long_running: bool,
    pub job_type: Option<JobType>,
    /// Applicable pipeline stages; `None` means always applicable.
    pub stages: Option<&'static [DealStage]>,
    /// Recommendation categories this action addresses.
    pub addresses: &'static [NbaCategory],
    pub min_tier: PlanTier,
}

impl ActionDefinition {
    /// True if the action applies at the given stage. No declared stage
    /// restriction matches every stage.
    pub fn applies_at(&self, stage: DealStage) -> bool {
        match self.stages {
            None => true,
            Some(stages) => stages.contains(&stage),
        }
    }
}

fn build_catalog() -> Vec<ActionDefinition> {
    use ActionCategory::*;
    use ActionId::*;
    vec![
        ActionDefinition {
            id: UpdateStage,
            label: "Update stage",
            description: "Move the deal to its next pipeline stage",
            category: RecordUpdate,
            requires_confirmation: true,
            long_running: false,
            job_type: None,
            stages: None,
            addresses: &[NbaCategory::FollowUp],
            min_tier: PlanTier::Starter,
        },
        ActionDefinition {
            id: SetNextAction,
            label: "Set next action",
            description: "Record what should happen next on this deal",
            category: RecordUpdate,
            requires_confirmation: false,
            long_running: false,
            job_type: None,
            stages: None,
            addresses: &[NbaCategory::FollowUp],
            min_tier: PlanTier::Starter,
        },
        ActionDefinition {
            id: CreateTask,
            label: "Create task",
            description: "Create a follow-up task for this deal",
            category: RecordUpdate,
            requires_confirmation: false,
            long_running: false,
            job_type: None,
            stages: None,
            addresses: &[NbaCategory::FollowUp],
            min_tier: PlanTier::Starter,
        },
        ActionDefinition {
            id: AddNote,
            label: "Add note",
            description: "Attach a note to the deal timeline",
            category: RecordUpdate,
            requires_confirmation: false,
            long_running: false,
            job_type: None,
            stages: None,
            addresses: &[NbaCategory::FollowUp],
            min_tier: PlanTier::Starter,
        },
        ActionDefinition {
            id: UnderwriteCheck,
            label: "Underwrite check",
            description: "Sanity-check the numbers against underwriting rules",
            category: Analysis,
            requires_confirmation: false,
            long_running: false,
            job_type: None,
            stages: None,
            addresses: &[NbaCategory::Analysis],
            min_tier: PlanTier::Starter,
        },
        ActionDefinition {
            id: UpdateAssumption,
            label: "Update assumption",
            description: "Change an underwriting assumption with evidence",
            category: Analysis,
            requires_confirmation: true,
            long_running: false,
            job_type: None,
            stages: None,
            addresses: &[NbaCategory::Analysis],
            min_tier: PlanTier::Starter,
        },
        ActionDefinition {
            id: ExtractFacts,
            label: "Extract facts",
            description: "Pull structured facts from call notes and documents",
            category: Analysis,
            requires_confirmation: false,
            long_running: true,
            job_type: Some(JobType::ExtractFacts),
            stages: None,
            addresses: &[NbaCategory::Analysis, NbaCategory::DataQuality],
            min_tier: PlanTier::Pro,
        },
        ActionDefinition {
            id: GenerateSellerReport,
            label: "Generate seller report",
            description: "Produce a seller-facing valuation report",
            category: Document,
            requires_confirmation: false,
            long_running: true,
            job_type: Some(JobType::SellerReport),
            stages: Some(&[
                DealStage::Contacted,
                DealStage::Appointment,
                DealStage::OfferSent,
            ]),
            addresses: &[NbaCategory::Documents],
            min_tier: PlanTier::Pro,
        },
        ActionDefinition {
            id: GenerateOfferPacket,
            label: "Generate offer packet",
            description: "Assemble the offer document packet",
            category: Offer,
            requires_confirmation: true,
            long_running: true,
            job_type: Some(JobType::OfferPacket),
            stages: Some(&[DealStage::Appointment, DealStage::OfferSent]),
            addresses: &[NbaCategory::Offer, NbaCategory::Documents],
            min_tier: PlanTier::Pro,
        },
        ActionDefinition {
            id: PrepareEsignEnvelope,
            label: "Prepare e-sign envelope",
            description: "Prepare an e-signature envelope for the offer",
            category: Document,
            requires_confirmation: true,
            long_running: true,
            job_type: Some(JobType::EsignEnvelope),
            stages: Some(&[DealStage::OfferSent, DealStage::UnderContract]),
            addresses: &[NbaCategory::Documents],
            min_tier: PlanTier::Elite,
        },
        ActionDefinition {
            id: DraftCounterText,
            label: "Draft counter text",
            description: "Draft a counter-offer message for review",
            category: Offer,
            requires_confirmation: true,
            long_running: false,
            job_type: None,
            stages: Some(&[DealStage::OfferSent, DealStage::UnderContract]),
            addresses: &[NbaCategory::Offer],
            min_tier: PlanTier::Pro,
        },
        ActionDefinition {
            id: DataQualityCheck,
            label: "Data quality check",
            description: "Report which core property fields are still missing",
            category: Analysis,
            requires_confirmation: false,
            long_running: false,
            job_type: None,
            stages: None,
            addresses: &[NbaCategory::DataQuality],
            min_tier: PlanTier::Starter,
        },
    ]
}

/// Every cataloged action, in definition order.
pub fn all_actions() -> &'static [ActionDefinition] {
    static CATALOG: OnceLock<Vec<ActionDefinition>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Look up one action's definition.
pub fn definition(id: ActionId) -> &'static ActionDefinition {
    // The catalog covers every ActionId variant; see test below.
    all_actions()
        .iter()
        .find(|d| d.id == id)
        .expect("catalog covers every ActionId")
}

/// Actions in the given catalog category, in definition order.
pub fn actions_by_category(category: ActionCategory) -> Vec<&'static ActionDefinition> {
    all_actions()
        .iter()
        .filter(|d| d.category == category)
        .collect()
}

/// Actions applicable at the given stage, in definition order.
pub fn actions_for_stage(stage: DealStage) -> Vec<&'static ActionDefinition> {
    all_actions()
        .iter()
        .filter(|d| d.applies_at(stage))
        .collect()
}

/// Actions whose addressed categories include the given one.
pub fn actions_for_nba_category(category: NbaCategory) -> Vec<&'static ActionDefinition> {
    all_actions()
        .iter()
        .filter(|d| d.addresses.contains(&category))
        .collect()
}

/// True iff the user's plan tier meets the action's minimum tier.
pub fn can_user_execute(id: ActionId, plan: PlanTier) -> bool {
    plan.meets(definition(id).min_tier)
}

/// Input for [`recommended_actions`].
#[derive(Debug, Clone)]
pub struct RecommendationContext {
    pub stage: DealStage,
    pub plan: PlanTier,
    /// Requested recommendation category, if the caller has one.
    pub category: Option<NbaCategory>,
    /// Names of property fields known to be missing.
    pub missing_info: Vec<String>,
    /// Cap on returned recommendations (`actions.max_recommendations` in
    /// the config).
    pub max_recommendations: usize,
}

impl RecommendationContext {
    pub fn new(stage: DealStage, plan: PlanTier) -> Self {
        Self {
            stage,
            plan,
            category: None,
            missing_info: Vec::new(),
            max_recommendations: MAX_RECOMMENDATIONS,
        }
    }

    /// Context with the plan tier and recommendation cap taken from the
    /// configuration.
    pub fn from_config(config: &DealflowConfig, stage: DealStage) -> Self {
        Self {
            max_recommendations: config.actions.max_recommendations,
            ..Self::new(stage, config.general.tier())
        }
    }
}

/// Default cap on recommendations when none is configured.
pub const MAX_RECOMMENDATIONS: usize = 6;

/// Recommend at most `ctx.max_recommendations` plan-filtered actions for
/// a deal context.
///
/// Ordering: the data-quality check leads when missing info was reported;
/// actions addressing the requested category come next; the remaining
/// stage-applicable actions fill out the list in catalog order.
/// Deterministic given identical inputs; no side effects.
pub fn recommended_actions(ctx: &RecommendationContext) -> Vec<&'static ActionDefinition> {
    let eligible: Vec<&ActionDefinition> = all_actions()
        .iter()
        .filter(|d| d.applies_at(ctx.stage) && ctx.plan.meets(d.min_tier))
        .collect();

    let mut out: Vec<&'static ActionDefinition> = Vec::new();

    if !ctx.missing_info.is_empty() {
        if let Some(dq) = eligible
            .iter()
            .copied()
            .find(|d| d.id == ActionId::DataQualityCheck)
        {
            out.push(dq);
        }
    }

    if let Some(category) = ctx.category {
        for d in eligible.iter().copied() {
            if d.addresses.contains(&category) && !out.iter().any(|o| o.id == d.id) {
                out.push(d);
            }
        }
    }

    for d in eligible.iter().copied() {
        if !out.iter().any(|o| o.id == d.id) {
            out.push(d);
        }
    }

    out.truncate(ctx.max_recommendations);
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_action_id() {
        for id in ActionId::ALL {
            assert!(
                all_actions().iter().any(|d| d.id == id),
                "no catalog entry for {}",
                id
            );
        }
        assert_eq!(all_actions().len(), ActionId::ALL.len());
    }

    #[test]
    fn test_catalog_ids_unique() {
        use std::collections::HashSet;
        let ids: HashSet<ActionId> = all_actions().iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), all_actions().len());
    }

    #[test]
    fn test_long_running_actions_have_job_types() {
        for d in all_actions() {
            assert_eq!(
                d.long_running,
                d.job_type.is_some(),
                "{} long_running/job_type mismatch",
                d.id
            );
        }
    }

    #[test]
    fn test_actions_by_category() {
        let offers = actions_by_category(ActionCategory::Offer);
        assert!(offers.iter().any(|d| d.id == ActionId::GenerateOfferPacket));
        assert!(offers.iter().any(|d| d.id == ActionId::DraftCounterText));
        assert!(offers.iter().all(|d| d.category == ActionCategory::Offer));
    }

    #[test]
    fn test_actions_for_stage_unrestricted_match_all() {
        for stage in [
            DealStage::New,
            DealStage::Contacted,
            DealStage::Appointment,
            DealStage::OfferSent,
            DealStage::UnderContract,
            DealStage::Closed,
            DealStage::Dead,
        ] {
            let actions = actions_for_stage(stage);
            // Stage-unrestricted actions always show up.
            assert!(actions.iter().any(|d| d.id == ActionId::AddNote));
            assert!(actions.iter().any(|d| d.id == ActionId::UnderwriteCheck));
        }
    }

    #[test]
    fn test_actions_for_stage_restricted() {
        let new_stage = actions_for_stage(DealStage::New);
        assert!(!new_stage.iter().any(|d| d.id == ActionId::GenerateOfferPacket));

        let appointment = actions_for_stage(DealStage::Appointment);
        assert!(appointment.iter().any(|d| d.id == ActionId::GenerateOfferPacket));
    }

    #[test]
    fn test_actions_for_nba_category() {
        let docs = actions_for_nba_category(NbaCategory::Documents);
        assert!(docs.iter().any(|d| d.id == ActionId::GenerateSellerReport));
        assert!(docs.iter().any(|d| d.id == ActionId::GenerateOfferPacket));
        assert!(!docs.iter().any(|d| d.id == ActionId::AddNote));
    }

    #[test]
    fn test_can_user_execute_tier_ordering() {
        assert!(can_user_execute(ActionId::AddNote, PlanTier::Starter));
        assert!(!can_user_execute(ActionId::ExtractFacts, PlanTier::Starter));
        assert!(can_user_execute(ActionId::ExtractFacts, PlanTier::Pro));
        assert!(!can_user_execute(ActionId::PrepareEsignEnvelope, PlanTier::Pro));
        assert!(can_user_execute(ActionId::PrepareEsignEnvelope, PlanTier::Elite));
    }

    // ---- recommended_actions ----

    fn ctx(stage: DealStage, plan: PlanTier) -> RecommendationContext {
        RecommendationContext::new(stage, plan)
    }

    #[test]
    fn test_recommendations_capped_at_six() {
        let recs = recommended_actions(&ctx(DealStage::OfferSent, PlanTier::Elite));
        assert!(recs.len() <= MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_recommendations_honor_configured_cap() {
        let mut config = DealflowConfig::default();
        config.actions.max_recommendations = 3;
        let context = RecommendationContext::from_config(&config, DealStage::OfferSent);

        // An Elite user at offer_sent would otherwise see more than 3.
        let mut elite = context.clone();
        elite.plan = PlanTier::Elite;
        let recs = recommended_actions(&elite);
        assert_eq!(recs.len(), 3);
    }

    #[test]
    fn test_from_config_reads_plan_tier() {
        let mut config = DealflowConfig::default();
        config.general.plan_tier = "elite".to_string();
        let mut context = RecommendationContext::from_config(&config, DealStage::OfferSent);
        assert_eq!(context.plan, PlanTier::Elite);
        assert_eq!(context.max_recommendations, MAX_RECOMMENDATIONS);

        // Elite-only document work is recommendable with the configured tier.
        context.category = Some(NbaCategory::Documents);
        let recs = recommended_actions(&context);
        assert!(recs.iter().any(|d| d.id == ActionId::PrepareEsignEnvelope));
    }

    #[test]
    fn test_recommendations_plan_filtered() {
        let recs = recommended_actions(&ctx(DealStage::OfferSent, PlanTier::Starter));
        for d in recs {
            assert!(
                PlanTier::Starter.meets(d.min_tier),
                "{} exceeds the caller's plan",
                d.id
            );
        }
    }

    #[test]
    fn test_recommendations_missing_info_puts_data_quality_first() {
        let mut context = ctx(DealStage::Contacted, PlanTier::Pro);
        context.missing_info = vec!["arv".to_string()];
        let recs = recommended_actions(&context);
        assert_eq!(recs[0].id, ActionId::DataQualityCheck);
    }

    #[test]
    fn test_recommendations_category_matches_ordered_next() {
        let mut context = ctx(DealStage::OfferSent, PlanTier::Elite);
        context.missing_info = vec!["arv".to_string()];
        context.category = Some(NbaCategory::Offer);
        let recs = recommended_actions(&context);

        assert_eq!(recs[0].id, ActionId::DataQualityCheck);
        // The next entries address the requested category.
        assert!(recs[1].addresses.contains(&NbaCategory::Offer));
    }

    #[test]
    fn test_recommendations_deterministic() {
        let context = ctx(DealStage::Appointment, PlanTier::Elite);
        let a: Vec<ActionId> = recommended_actions(&context).iter().map(|d| d.id).collect();
        let b: Vec<ActionId> = recommended_actions(&context).iter().map(|d| d.id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_recommendations_no_duplicates() {
        use std::collections::HashSet;
        let mut context = ctx(DealStage::OfferSent, PlanTier::Elite);
        context.missing_info = vec!["arv".to_string()];
        context.category = Some(NbaCategory::DataQuality);
        let recs = recommended_actions(&context);
        let ids: HashSet<ActionId> = recs.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), recs.len());
    }

    #[test]
    fn test_recommendations_respect_stage() {
        let recs = recommended_actions(&ctx(DealStage::New, PlanTier::Elite));
        assert!(!recs.iter().any(|d| d.id == ActionId::GenerateOfferPacket));
    }
}
