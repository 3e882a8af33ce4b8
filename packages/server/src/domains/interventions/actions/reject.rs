//! Reject a pending intervention

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, InterventionId, UserId};
use crate::domains::interventions::events::InterventionEvent;
use crate::domains::interventions::models::{
    Intervention, InterventionComment, InterventionStatus,
};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RejectIntervention {
    pub intervention_id: InterventionId,
    pub actor: UserId,
    #[builder(setter(into))]
    pub reason: String,
    #[builder(default, setter(into, strip_option))]
    pub internal_comment: Option<String>,
}

/// Reject an intervention request.
///
/// Valid only from `pending`. The reason is recorded as a public comment
/// (plus an optional internal one) in the same transaction as the status
/// write; the tenant is notified post-commit.
pub async fn reject_intervention(
    args: RejectIntervention,
    deps: &ServerDeps,
) -> DomainResult<Intervention> {
    if args.reason.trim().is_empty() {
        return Err(DomainError::Validation(
            "a rejection reason is required".to_string(),
        ));
    }

    let intervention = Intervention::find_by_id(args.intervention_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("intervention"))?;

    let mut tx = deps.db_pool.begin().await?;

    let rejected = Intervention::update_status(
        args.intervention_id,
        InterventionStatus::Rejected,
        &[InterventionStatus::Pending],
        &mut *tx,
    )
    .await?
    .ok_or_else(|| {
        DomainError::invalid_state(format!(
            "only pending interventions can be rejected (currently {})",
            intervention.status
        ))
    })?;

    InterventionComment::insert(
        args.intervention_id,
        Some(args.actor),
        &args.reason,
        false,
        &mut *tx,
    )
    .await?;

    if let Some(internal) = &args.internal_comment {
        InterventionComment::insert(args.intervention_id, Some(args.actor), internal, true, &mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!(intervention_id = %args.intervention_id, "Intervention rejected");

    deps.outbox.publish(InterventionEvent::StatusChanged {
        intervention_id: args.intervention_id,
        from: InterventionStatus::Pending,
        to: InterventionStatus::Rejected,
        changed_by: args.actor,
        reason: Some(args.reason),
        internal_note: args.internal_comment,
    });

    Ok(rejected)
}
