//! Split a multi-provider intervention into per-provider children

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{
    AssignmentId, DomainError, DomainResult, InstructionId, InterventionId, QuoteId, TimeSlotId,
    UserId,
};
use crate::domains::interventions::events::InterventionEvent;
use crate::domains::interventions::machines::CANCELLABLE_STATUSES;
use crate::domains::interventions::models::{
    Assignment, Intervention, InterventionStatus, ParticipantRole, ProviderInstruction, TimeSlot,
};
use crate::domains::quotes::models::Quote;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, TypedBuilder)]
pub struct SplitIntervention {
    pub parent_id: InterventionId,
    pub actor: UserId,
}

/// Result of a split: one child per distinct provider.
#[derive(Debug, Clone, Serialize)]
pub struct SplitOutcome {
    pub parent_id: InterventionId,
    pub child_ids: Vec<InterventionId>,
    pub parent_cancelled: bool,
}

impl SplitOutcome {
    pub fn created(&self) -> usize {
        self.child_ids.len()
    }
}

/// Split a parent intervention with several assigned providers into N
/// independent single-provider children.
///
/// Each child carries the provider's own quotes, time slots and
/// instructions, plus copies of the manager and tenant assignments. The
/// parent is closed out: cancelled when its status allows, untouched
/// otherwise. A child can never be split again (its
/// parent_intervention_id is set).
pub async fn split_intervention(
    args: SplitIntervention,
    deps: &ServerDeps,
) -> DomainResult<SplitOutcome> {
    let parent = Intervention::find_by_id(args.parent_id, &deps.db_pool)
        .await?
        .ok_or_else(|| DomainError::not_found("intervention"))?;

    if parent.parent_intervention_id.is_some() {
        return Err(DomainError::invalid_state(
            "an intervention produced by a split cannot be split again",
        ));
    }

    let assignments = Assignment::find_for_intervention(args.parent_id, &deps.db_pool).await?;
    let provider_ids = Assignment::distinct_provider_ids(args.parent_id, &deps.db_pool).await?;
    if provider_ids.len() <= 1 {
        return Err(DomainError::invalid_state(
            "splitting requires more than one assigned provider",
        ));
    }

    let mut tx = deps.db_pool.begin().await?;
    let mut child_ids = Vec::with_capacity(provider_ids.len());

    for provider_id in &provider_ids {
        let child = Intervention {
            id: InterventionId::new(),
            team_id: parent.team_id,
            building_id: parent.building_id,
            lot_id: parent.lot_id,
            title: parent.title.clone(),
            description: parent.description.clone(),
            status: parent.status.clone(),
            scheduled_date: parent.scheduled_date,
            requires_participant_confirmation: parent.requires_participant_confirmation,
            parent_intervention_id: Some(parent.id),
            created_by: args.actor,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let child = child.insert(&mut *tx).await?;

        // This provider's assignment plus every manager/tenant assignment.
        for assignment in &assignments {
            let keep = match assignment.role()? {
                ParticipantRole::Provider => assignment.user_id == *provider_id,
                ParticipantRole::Manager | ParticipantRole::Tenant => true,
            };
            if !keep {
                continue;
            }
            Assignment {
                id: AssignmentId::new(),
                intervention_id: child.id,
                ..assignment.clone()
            }
            .insert(&mut *tx)
            .await?;
        }

        // The provider's own quotes follow, status preserved verbatim.
        for quote in Quote::find_for_provider(parent.id, *provider_id, &mut *tx).await? {
            Quote {
                id: QuoteId::new(),
                intervention_id: child.id,
                ..quote
            }
            .insert(&mut *tx)
            .await?;
        }

        // Provider-specific time slots and instructions.
        for slot in TimeSlot::find_for_provider(parent.id, *provider_id, &mut *tx).await? {
            TimeSlot {
                id: TimeSlotId::new(),
                intervention_id: child.id,
                ..slot
            }
            .insert(&mut *tx)
            .await?;
        }
        for instruction in
            ProviderInstruction::find_for_provider(parent.id, *provider_id, &mut *tx).await?
        {
            ProviderInstruction {
                id: InstructionId::new(),
                intervention_id: child.id,
                ..instruction
            }
            .insert(&mut *tx)
            .await?;
        }

        child_ids.push(child.id);
    }

    // Close out the parent: the children own all remaining work. Outside the
    // cancellable statuses the parent is left as it is.
    let parent_cancelled = Intervention::update_status(
        parent.id,
        InterventionStatus::Cancelled,
        CANCELLABLE_STATUSES,
        &mut *tx,
    )
    .await?
    .is_some();

    tx.commit().await?;

    info!(
        parent_id = %parent.id,
        children = child_ids.len(),
        parent_cancelled,
        "Intervention split"
    );

    deps.outbox.publish(InterventionEvent::Split {
        parent_id: parent.id,
        child_ids: child_ids.clone(),
        actor: args.actor,
        parent_cancelled,
    });

    Ok(SplitOutcome {
        parent_id: parent.id,
        child_ids,
        parent_cancelled,
    })
}
