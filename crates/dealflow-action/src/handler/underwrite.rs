//! Underwriting and data-quality check handlers.
//!
//! Both are advisory only: they return inline content and never propose a
//! PatchSet.

use dealflow_core::Property;

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{ActionId, ActionInput, HandlerContext, HandlerPayload, InlineContent};

/// Purchase price above this fraction of ARV is flagged.
const MAX_PRICE_TO_ARV: f64 = 0.85;
/// Repair cost above this fraction of ARV is flagged.
const MAX_REPAIR_TO_ARV: f64 = 0.40;

pub struct UnderwriteCheckHandler;

impl UnderwriteCheckHandler {
    fn issues(property: &Property) -> Vec<String> {
        let mut issues = Vec::new();

        if property.arv.is_none() {
            issues.push("Missing ARV (After Repair Value)".to_string());
        }
        if property.repair_cost.is_none() {
            issues.push("Missing repair cost estimate".to_string());
        }
        if property.purchase_price.is_none() {
            issues.push("Missing purchase price".to_string());
        }

        if let (Some(arv), Some(price)) = (property.arv, property.purchase_price) {
            if arv > 0.0 && price / arv > MAX_PRICE_TO_ARV {
                issues.push(format!(
                    "Purchase price is {:.0}% of ARV (above the {:.0}% guideline)",
                    price / arv * 100.0,
                    MAX_PRICE_TO_ARV * 100.0
                ));
            }
        }
        if let (Some(arv), Some(repair)) = (property.arv, property.repair_cost) {
            if arv > 0.0 && repair / arv > MAX_REPAIR_TO_ARV {
                issues.push(format!(
                    "Repair cost is {:.0}% of ARV (above the {:.0}% guideline)",
                    repair / arv * 100.0,
                    MAX_REPAIR_TO_ARV * 100.0
                ));
            }
        }

        issues
    }
}

impl ActionHandler for UnderwriteCheckHandler {
    fn action_id(&self) -> ActionId {
        ActionId::UnderwriteCheck
    }

    fn handle(
        &self,
        _input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let property = ctx.property.as_ref().ok_or_else(|| {
            ActionError::Precondition("No property on file to underwrite".to_string())
        })?;

        let issues = Self::issues(property);
        let recommendation = if issues.is_empty() {
            "Numbers are within underwriting guidelines".to_string()
        } else {
            format!("Resolve {} issue(s) before sending an offer", issues.len())
        };

        Ok(HandlerPayload::Content(InlineContent {
            text: format!("Underwrite check found {} issue(s)", issues.len()),
            issues,
            suggestions: Vec::new(),
            recommendation: Some(recommendation),
        }))
    }
}

pub struct DataQualityCheckHandler;

impl ActionHandler for DataQualityCheckHandler {
    fn action_id(&self) -> ActionId {
        ActionId::DataQualityCheck
    }

    fn handle(
        &self,
        _input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let missing: Vec<String> = match ctx.property.as_ref() {
            None => vec!["property record".to_string()],
            Some(p) => {
                let mut missing = Vec::new();
                if p.arv.is_none() {
                    missing.push("arv".to_string());
                }
                if p.repair_cost.is_none() {
                    missing.push("repair_cost".to_string());
                }
                if p.purchase_price.is_none() {
                    missing.push("purchase_price".to_string());
                }
                missing
            }
        };

        let text = if missing.is_empty() {
            "All core property fields are present".to_string()
        } else {
            format!("Missing fields: {}", missing.join(", "))
        };

        Ok(HandlerPayload::Content(InlineContent {
            text,
            issues: missing,
            suggestions: Vec::new(),
            recommendation: None,
        }))
    }
}
