//! Provider finalizes and sends a pending bid

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, QuoteId, UserId};
use crate::domains::quotes::events::QuoteEvent;
use crate::domains::quotes::models::Quote;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct SendQuote {
    pub quote_id: QuoteId,
    pub provider: UserId,
}

/// Mark a pending quote as sent.
///
/// Only the owning provider; legacy pending spellings count as pending.
pub async fn send_quote(args: SendQuote, deps: &ServerDeps) -> DomainResult<Quote> {
    let quote = Quote::find_by_id(args.quote_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("quote"))?;

    if quote.provider_id != args.provider {
        return Err(DomainError::forbidden(
            "the quote belongs to another provider",
        ));
    }

    let sent = Quote::mark_sent(args.quote_id, args.provider, &deps.db_pool)
        .await?
        .ok_or_else(|| {
            DomainError::invalid_state(format!(
                "only a pending quote can be sent (currently {})",
                quote.status
            ))
        })?;

    info!(quote_id = %args.quote_id, "Quote sent");

    deps.outbox.publish(QuoteEvent::Sent {
        quote_id: args.quote_id,
        intervention_id: quote.intervention_id,
        provider_id: quote.provider_id,
    });

    Ok(sent)
}
