//! Intervention lifecycle - the transition graph
//!
//! Pure data, no IO. Actions consult this module, then apply the transition
//! through the conditional update in the model so concurrent writers cannot
//! both succeed against stale state.
//!
//! Graph:
//!   pending → approved | rejected
//!   approved → quote_requested
//!   quote_requested → scheduling
//!   scheduling → scheduled
//!   scheduled → in_progress
//!   in_progress → provider_completed
//!   provider_completed → tenant_validated
//!   tenant_validated → completed
//!   {approved, quote_requested, scheduling, scheduled, in_progress} → cancelled
//!
//! rejected, completed and cancelled are terminal.

use crate::domains::interventions::models::InterventionStatus::{self, *};

/// Statuses from which an intervention may be cancelled.
pub const CANCELLABLE_STATUSES: &[InterventionStatus] =
    &[Approved, QuoteRequested, Scheduling, Scheduled, InProgress];

/// Statuses an intervention may move to from `from`.
pub fn transitions_from(from: InterventionStatus) -> &'static [InterventionStatus] {
    match from {
        Pending => &[Approved, Rejected],
        Approved => &[QuoteRequested, Cancelled],
        QuoteRequested => &[Scheduling, Cancelled],
        Scheduling => &[Scheduled, Cancelled],
        Scheduled => &[InProgress, Cancelled],
        InProgress => &[ProviderCompleted, Cancelled],
        ProviderCompleted => &[TenantValidated],
        TenantValidated => &[Completed],
        Rejected | Completed | Cancelled => &[],
    }
}

/// Whether `from → to` is an edge of the graph.
pub fn can_transition(from: InterventionStatus, to: InterventionStatus) -> bool {
    transitions_from(from).contains(&to)
}

/// Terminal statuses have no outgoing edges.
pub fn is_terminal(status: InterventionStatus) -> bool {
    transitions_from(status).is_empty()
}
