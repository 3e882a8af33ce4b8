//! Primary provider accepts the proposed schedule

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, InterventionId, UserId};
use crate::domains::interventions::events::InterventionEvent;
use crate::domains::interventions::models::{Assignment, Intervention, InterventionStatus};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct AcceptSchedule {
    pub intervention_id: InterventionId,
    pub actor: UserId,
}

/// Accept the proposed schedule on behalf of the primary provider.
///
/// Valid only from `scheduling`, only for the primary provider assignment,
/// and only once a scheduled date exists. Moves the intervention to
/// `scheduled` and notifies the primary manager post-commit.
pub async fn accept_schedule(
    args: AcceptSchedule,
    deps: &ServerDeps,
) -> DomainResult<Intervention> {
    let intervention = Intervention::find_by_id(args.intervention_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("intervention"))?;

    let primary_provider = Assignment::find_primary_provider(args.intervention_id, &deps.db_pool)
        .await?
        .filter(|assignment| assignment.user_id == args.actor)
        .ok_or_else(|| {
            DomainError::forbidden("only the primary provider can accept the schedule")
        })?;

    if intervention.scheduled_date.is_none() {
        return Err(DomainError::not_found("scheduled date"));
    }

    let scheduled = Intervention::update_status(
        args.intervention_id,
        InterventionStatus::Scheduled,
        &[InterventionStatus::Scheduling],
        &deps.db_pool,
    )
    .await?
    .ok_or_else(|| {
        DomainError::invalid_state(format!(
            "the schedule can only be accepted while scheduling (currently {})",
            intervention.status
        ))
    })?;

    info!(
        intervention_id = %args.intervention_id,
        provider_id = %primary_provider.user_id,
        "Schedule accepted"
    );

    deps.outbox.publish(InterventionEvent::ScheduleAccepted {
        intervention_id: args.intervention_id,
        provider_id: args.actor,
    });

    Ok(scheduled)
}
