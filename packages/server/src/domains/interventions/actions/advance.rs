//! Forward transitions along the lifecycle chain
//!
//! Approve, request quotes, start work, provider completion, tenant
//! validation and closing all share one shape: a single-edge forward move.
//! Rejection, cancellation and schedule acceptance have their own actions
//! with extra rules.

use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{DomainError, DomainResult, InterventionId, UserId};
use crate::domains::interventions::events::InterventionEvent;
use crate::domains::interventions::machines;
use crate::domains::interventions::models::{Intervention, InterventionStatus};
use crate::kernel::ServerDeps;

/// Targets reachable through this action. The special-cased transitions
/// (rejected, cancelled, scheduled) are deliberately absent.
const ADVANCE_TARGETS: &[InterventionStatus] = &[
    InterventionStatus::Approved,
    InterventionStatus::QuoteRequested,
    InterventionStatus::Scheduling,
    InterventionStatus::InProgress,
    InterventionStatus::ProviderCompleted,
    InterventionStatus::TenantValidated,
    InterventionStatus::Completed,
];

#[derive(Debug, Clone, TypedBuilder)]
pub struct AdvanceIntervention {
    pub intervention_id: InterventionId,
    pub actor: UserId,
    pub to: InterventionStatus,
}

/// Move an intervention one step forward along the lifecycle.
pub async fn advance_intervention(
    args: AdvanceIntervention,
    deps: &ServerDeps,
) -> DomainResult<Intervention> {
    if !ADVANCE_TARGETS.contains(&args.to) {
        return Err(DomainError::Validation(format!(
            "{} is not a forward transition target",
            args.to
        )));
    }

    let intervention = Intervention::find_by_id(args.intervention_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("intervention"))?;
    let from = intervention.status()?;

    // The expected set is every source the graph allows for this target;
    // the conditional write settles which one actually held.
    let expected: Vec<InterventionStatus> = ADVANCE_SOURCES
        .iter()
        .copied()
        .filter(|candidate| machines::can_transition(*candidate, args.to))
        .collect();

    let updated =
        Intervention::update_status(args.intervention_id, args.to, &expected, &deps.db_pool)
            .await?
            .ok_or_else(|| {
                DomainError::invalid_state(format!(
                    "cannot move an intervention from {} to {}",
                    intervention.status, args.to
                ))
            })?;

    info!(intervention_id = %args.intervention_id, from = %from, to = %args.to, "Intervention advanced");

    deps.outbox.publish(InterventionEvent::StatusChanged {
        intervention_id: args.intervention_id,
        from,
        to: args.to,
        changed_by: args.actor,
        reason: None,
        internal_note: None,
    });

    Ok(updated)
}

/// Every non-terminal status - candidate sources for a forward edge.
const ADVANCE_SOURCES: &[InterventionStatus] = &[
    InterventionStatus::Pending,
    InterventionStatus::Approved,
    InterventionStatus::QuoteRequested,
    InterventionStatus::Scheduling,
    InterventionStatus::Scheduled,
    InterventionStatus::InProgress,
    InterventionStatus::ProviderCompleted,
    InterventionStatus::TenantValidated,
];
