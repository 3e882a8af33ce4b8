//! Provider submits a new bid

use rust_decimal::Decimal;
use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, InterventionId, QuoteId, UserId};
use crate::domains::interventions::models::{
    Assignment, Intervention, InterventionStatus, ParticipantRole,
};
use crate::domains::quotes::events::QuoteEvent;
use crate::domains::quotes::models::{Quote, QuoteStatus};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct SubmitQuote {
    pub intervention_id: InterventionId,
    pub provider: UserId,
    pub amount: Decimal,
    #[builder(default, setter(into, strip_option))]
    pub description: Option<String>,
}

/// Submit a pending bid against an intervention.
///
/// The caller must hold a provider assignment and the intervention must be
/// collecting quotes.
pub async fn submit_quote(args: SubmitQuote, deps: &ServerDeps) -> DomainResult<Quote> {
    if args.amount <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "the quote amount must be positive".to_string(),
        ));
    }

    let intervention = Intervention::find_by_id(args.intervention_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("intervention"))?;

    let assignment = Assignment::find_for_user(args.intervention_id, args.provider, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::forbidden("not assigned to this intervention"))?;
    if assignment.role()? != ParticipantRole::Provider {
        return Err(DomainError::forbidden("only providers can submit quotes"));
    }

    if intervention.status()? != InterventionStatus::QuoteRequested {
        return Err(DomainError::invalid_state(format!(
            "the intervention is not collecting quotes (currently {})",
            intervention.status
        )));
    }

    let quote = Quote {
        id: QuoteId::new(),
        intervention_id: args.intervention_id,
        provider_id: args.provider,
        amount: args.amount,
        description: args.description,
        status: QuoteStatus::Pending.as_str().to_string(),
        validated_by: None,
        validated_at: None,
        rejection_reason: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
    .insert(&deps.db_pool)
    .await?;

    info!(quote_id = %quote.id, intervention_id = %args.intervention_id, "Quote submitted");

    deps.outbox.publish(QuoteEvent::Submitted {
        quote_id: quote.id,
        intervention_id: args.intervention_id,
        provider_id: args.provider,
    });

    Ok(quote)
}
