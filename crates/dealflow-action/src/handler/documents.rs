//! Long-running document handlers.
//!
//! Each returns a job-submission request, never executes synchronously,
//! and validates just enough input to avoid queueing a job guaranteed to
//! fail.

use dealflow_job::{JobRequest, JobType};

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{ActionId, ActionInput, HandlerContext, HandlerPayload};

pub struct ExtractFactsHandler;

impl ActionHandler for ExtractFactsHandler {
    fn action_id(&self) -> ActionId {
        ActionId::ExtractFacts
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        Ok(HandlerPayload::Job(JobRequest {
            job_type: JobType::ExtractFacts,
            deal_id: Some(ctx.deal.id),
            input: serde_json::json!({
                "deal_id": ctx.deal.id,
                "source": input.str_param("source"),
            }),
        }))
    }
}

pub struct GenerateSellerReportHandler;

impl ActionHandler for GenerateSellerReportHandler {
    fn action_id(&self) -> ActionId {
        ActionId::GenerateSellerReport
    }

    fn handle(
        &self,
        _input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let property = ctx.property.as_ref().ok_or_else(|| {
            ActionError::Precondition("No property on file for a seller report".to_string())
        })?;
        let arv = property.arv.ok_or_else(|| {
            ActionError::Precondition(
                "Seller report needs ARV before it can be generated".to_string(),
            )
        })?;
        let purchase_price = property.purchase_price.ok_or_else(|| {
            ActionError::Precondition(
                "Seller report needs a purchase price before it can be generated".to_string(),
            )
        })?;

        Ok(HandlerPayload::Job(JobRequest {
            job_type: JobType::SellerReport,
            deal_id: Some(ctx.deal.id),
            input: serde_json::json!({
                "deal_id": ctx.deal.id,
                "address": property.address,
                "arv": arv,
                "purchase_price": purchase_price,
                "repair_cost": property.repair_cost,
            }),
        }))
    }
}

pub struct GenerateOfferPacketHandler;

impl ActionHandler for GenerateOfferPacketHandler {
    fn action_id(&self) -> ActionId {
        ActionId::GenerateOfferPacket
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        // Explicit amount wins; otherwise fall back to the property's
        // purchase price.
        let amount = input
            .f64_param("amount")
            .or_else(|| ctx.property.as_ref().and_then(|p| p.purchase_price))
            .ok_or_else(|| {
                ActionError::Precondition(
                    "Cannot draft an offer packet with no offer amount".to_string(),
                )
            })?;

        Ok(HandlerPayload::Job(JobRequest {
            job_type: JobType::OfferPacket,
            deal_id: Some(ctx.deal.id),
            input: serde_json::json!({
                "deal_id": ctx.deal.id,
                "amount": amount,
                "address": ctx.property.as_ref().map(|p| p.address.clone()),
            }),
        }))
    }
}

pub struct PrepareEsignEnvelopeHandler;

impl ActionHandler for PrepareEsignEnvelopeHandler {
    fn action_id(&self) -> ActionId {
        ActionId::PrepareEsignEnvelope
    }

    fn handle(
        &self,
        input: &ActionInput,
        ctx: &HandlerContext,
    ) -> Result<HandlerPayload, ActionError> {
        let recipient = input
            .str_param("recipient_email")
            .ok_or_else(|| ActionError::missing_field("recipient_email"))?;

        Ok(HandlerPayload::Job(JobRequest {
            job_type: JobType::EsignEnvelope,
            deal_id: Some(ctx.deal.id),
            input: serde_json::json!({
                "deal_id": ctx.deal.id,
                "recipient_email": recipient,
            }),
        }))
    }
}
