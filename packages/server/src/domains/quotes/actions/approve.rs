//! Approve a quote - the mutual-exclusion point of the bid workflow

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, QuoteId, UserId};
use crate::domains::interventions::models::{Intervention, InterventionStatus};
use crate::domains::quotes::events::QuoteEvent;
use crate::domains::quotes::models::{Quote, SUPERSEDED_REASON};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ApproveQuote {
    pub quote_id: QuoteId,
    pub approver: UserId,
    #[builder(default, setter(into, strip_option))]
    pub comments: Option<String>,
}

/// Approve a quote.
///
/// One transaction carries all three writes so no interleaving can leave
/// two accepted quotes or a stranded pending competitor:
/// 1. conditionally accept this quote (pending/sent only, aliases included)
/// 2. conditionally move the intervention quote_requested → scheduling
/// 3. batch-reject every other still-open quote of the intervention
///
/// Any guard missing rolls the whole thing back with `InvalidState`.
pub async fn approve_quote(args: ApproveQuote, deps: &ServerDeps) -> DomainResult<Quote> {
    let quote = Quote::find_by_id(args.quote_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("quote"))?;

    let mut tx = deps.db_pool.begin().await?;

    let accepted = Quote::accept(args.quote_id, args.approver, &mut *tx)
        .await?
        .ok_or_else(|| {
            DomainError::invalid_state(format!(
                "only a pending or sent quote can be approved (currently {})",
                quote.status
            ))
        })?;

    Intervention::update_status(
        quote.intervention_id,
        InterventionStatus::Scheduling,
        &[InterventionStatus::QuoteRequested],
        &mut *tx,
    )
    .await?
    .ok_or_else(|| {
        DomainError::invalid_state("the intervention is no longer awaiting a quote decision")
    })?;

    let competitors_rejected = Quote::bulk_reject_competitors(
        quote.intervention_id,
        args.quote_id,
        SUPERSEDED_REASON,
        &mut *tx,
    )
    .await?;

    tx.commit().await?;

    info!(
        quote_id = %args.quote_id,
        intervention_id = %quote.intervention_id,
        competitors_rejected,
        "Quote approved"
    );

    deps.outbox.publish(QuoteEvent::Approved {
        quote_id: args.quote_id,
        intervention_id: quote.intervention_id,
        provider_id: quote.provider_id,
        approved_by: args.approver,
        comments: args.comments,
        competitors_rejected,
    });

    Ok(accepted)
}
