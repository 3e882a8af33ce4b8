//! Cancel an in-flight intervention

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, InterventionId, UserId};
use crate::domains::interventions::events::InterventionEvent;
use crate::domains::interventions::machines::CANCELLABLE_STATUSES;
use crate::domains::interventions::models::{Intervention, InterventionStatus};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct CancelIntervention {
    pub intervention_id: InterventionId,
    pub actor: UserId,
    #[builder(setter(into))]
    pub reason: String,
    #[builder(default, setter(into, strip_option))]
    pub internal_comment: Option<String>,
}

/// Cancel an intervention.
///
/// Valid only while work has not finished (approved through in_progress).
/// The previous status, reason and actor land in the activity log
/// post-commit; a notification failure never fails the call.
pub async fn cancel_intervention(
    args: CancelIntervention,
    deps: &ServerDeps,
) -> DomainResult<Intervention> {
    if args.reason.trim().is_empty() {
        return Err(DomainError::Validation(
            "a cancellation reason is required".to_string(),
        ));
    }

    let intervention = Intervention::find_by_id(args.intervention_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("intervention"))?;
    let previous = intervention.status()?;

    let cancelled = Intervention::update_status(
        args.intervention_id,
        InterventionStatus::Cancelled,
        CANCELLABLE_STATUSES,
        &deps.db_pool,
    )
    .await?
    .ok_or_else(|| {
        DomainError::invalid_state(format!(
            "an intervention in status {} cannot be cancelled",
            intervention.status
        ))
    })?;

    info!(intervention_id = %args.intervention_id, previous = %previous, "Intervention cancelled");

    deps.outbox.publish(InterventionEvent::StatusChanged {
        intervention_id: args.intervention_id,
        from: previous,
        to: InterventionStatus::Cancelled,
        changed_by: args.actor,
        reason: Some(args.reason),
        internal_note: args.internal_comment,
    });

    Ok(cancelled)
}
