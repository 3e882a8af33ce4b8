//! Participant confirmation - the input the permission resolver consumes

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, InterventionId, UserId};
use crate::domains::interventions::events::InterventionEvent;
use crate::domains::interventions::models::{Assignment, ConfirmationStatus, Intervention};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ConfirmParticipation {
    pub intervention_id: InterventionId,
    pub actor: UserId,
    pub accept: bool,
}

/// Confirm or decline participation in an intervention.
///
/// Only pending confirmations move, and only to confirmed or rejected;
/// declining is final for the assignment.
pub async fn confirm_participation(
    args: ConfirmParticipation,
    deps: &ServerDeps,
) -> DomainResult<Assignment> {
    Intervention::find_by_id(args.intervention_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("intervention"))?;

    let assignment = Assignment::find_for_user(args.intervention_id, args.actor, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::forbidden("not assigned to this intervention"))?;

    let current = assignment.confirmation_status()?;
    if !assignment.requires_confirmation || current == ConfirmationStatus::NotRequired {
        return Err(DomainError::invalid_state(
            "this assignment does not require confirmation",
        ));
    }

    let target = if args.accept {
        ConfirmationStatus::Confirmed
    } else {
        ConfirmationStatus::Rejected
    };

    let resolved = Assignment::resolve_confirmation(assignment.id, target, &deps.db_pool)
        .await?
        .ok_or_else(|| {
            DomainError::invalid_state(format!(
                "confirmation was already resolved ({})",
                assignment.confirmation_status
            ))
        })?;

    info!(
        intervention_id = %args.intervention_id,
        user_id = %args.actor,
        accepted = args.accept,
        "Participation resolved"
    );

    deps.outbox.publish(InterventionEvent::ParticipationResolved {
        intervention_id: args.intervention_id,
        assignment_id: assignment.id,
        user_id: args.actor,
        accepted: args.accept,
    });

    Ok(resolved)
}
