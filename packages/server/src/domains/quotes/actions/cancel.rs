//! Provider withdraws a pending quote

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, QuoteId, UserId};
use crate::domains::quotes::events::QuoteEvent;
use crate::domains::quotes::models::Quote;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct CancelQuote {
    pub quote_id: QuoteId,
    pub provider: UserId,
}

/// Cancel (withdraw) a quote.
///
/// Only the owning provider, only while the quote is still pending. The
/// managers of the intervention and of the building are notified
/// post-commit, deduplicated by user id.
pub async fn cancel_quote(args: CancelQuote, deps: &ServerDeps) -> DomainResult<Quote> {
    let quote = Quote::find_by_id(args.quote_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("quote"))?;

    if quote.provider_id != args.provider {
        return Err(DomainError::forbidden(
            "the quote belongs to another provider",
        ));
    }

    let cancelled = Quote::cancel_by_provider(args.quote_id, args.provider, &deps.db_pool)
        .await?
        .ok_or_else(|| {
            DomainError::invalid_state(format!(
                "only a pending quote can be withdrawn (currently {})",
                quote.status
            ))
        })?;

    info!(quote_id = %args.quote_id, provider_id = %args.provider, "Quote withdrawn");

    deps.outbox.publish(QuoteEvent::Cancelled {
        quote_id: args.quote_id,
        intervention_id: quote.intervention_id,
        provider_id: quote.provider_id,
    });

    Ok(cancelled)
}
