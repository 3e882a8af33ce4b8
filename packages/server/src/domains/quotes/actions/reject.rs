//! Reject a single quote

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, QuoteId, UserId};
use crate::domains::quotes::events::QuoteEvent;
use crate::domains::quotes::models::Quote;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RejectQuote {
    pub quote_id: QuoteId,
    pub approver: UserId,
    #[builder(setter(into))]
    pub reason: String,
}

/// Reject a quote.
///
/// Pending only (legacy spellings included). The provider is notified
/// post-commit over in-app, push and email; delivery failures are logged
/// and never surface here.
pub async fn reject_quote(args: RejectQuote, deps: &ServerDeps) -> DomainResult<Quote> {
    if args.reason.trim().is_empty() {
        return Err(DomainError::Validation(
            "a rejection reason is required".to_string(),
        ));
    }

    let quote = Quote::find_by_id(args.quote_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("quote"))?;

    let rejected = Quote::reject(args.quote_id, args.approver, &args.reason, &deps.db_pool)
        .await?
        .ok_or_else(|| {
            DomainError::invalid_state(format!(
                "the quote was already resolved (currently {})",
                quote.status
            ))
        })?;

    info!(quote_id = %args.quote_id, "Quote rejected");

    deps.outbox.publish(QuoteEvent::Rejected {
        quote_id: args.quote_id,
        intervention_id: quote.intervention_id,
        provider_id: quote.provider_id,
        rejected_by: args.approver,
        reason: args.reason,
    });

    Ok(rejected)
}
