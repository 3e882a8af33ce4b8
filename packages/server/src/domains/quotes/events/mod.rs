use serde::{Deserialize, Serialize};

use crate::common::{InterventionId, QuoteId, UserId};

/// Quote domain events - FACT EVENTS ONLY
///
/// Immutable facts about committed quote state changes; consumed by the
/// outbox worker for activity logging and notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QuoteEvent {
    /// A provider submitted a new bid
    Submitted {
        quote_id: QuoteId,
        intervention_id: InterventionId,
        provider_id: UserId,
    },

    /// A provider finalized and sent their bid
    Sent {
        quote_id: QuoteId,
        intervention_id: InterventionId,
        provider_id: UserId,
    },

    /// A quote won: it was accepted and every open competitor was rejected
    Approved {
        quote_id: QuoteId,
        intervention_id: InterventionId,
        provider_id: UserId,
        approved_by: UserId,
        comments: Option<String>,
        competitors_rejected: u64,
    },

    /// A quote was individually rejected
    Rejected {
        quote_id: QuoteId,
        intervention_id: InterventionId,
        provider_id: UserId,
        rejected_by: UserId,
        reason: String,
    },

    /// The owning provider withdrew their pending quote
    Cancelled {
        quote_id: QuoteId,
        intervention_id: InterventionId,
        provider_id: UserId,
    },
}
