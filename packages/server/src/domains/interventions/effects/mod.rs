//! Intervention domain effects - post-commit side effects
//!
//! Handlers run on the outbox worker after the primary write committed.
//! Everything here is best-effort: a failure is logged by the worker and
//! never reaches the caller of the action.

use anyhow::Result;
use serde_json::json;
use tracing::warn;

use crate::domains::interventions::events::InterventionEvent;
use crate::domains::interventions::models::{ActivityLogEntry, Assignment, Intervention};
use crate::kernel::ServerDeps;

/// Route one intervention fact event to its side effects.
pub async fn handle_event(event: InterventionEvent, deps: &ServerDeps) -> Result<()> {
    match event {
        InterventionEvent::StatusChanged {
            intervention_id,
            from,
            to,
            changed_by,
            reason,
            internal_note,
        } => {
            ActivityLogEntry::record(
                "intervention",
                intervention_id.into_uuid(),
                "status_changed",
                Some(changed_by),
                json!({
                    "from": from,
                    "to": to,
                    "reason": reason,
                    "internal_note": internal_note,
                }),
                &deps.db_pool,
            )
            .await?;

            let intervention = match Intervention::find_by_id(intervention_id, &deps.db_pool).await?
            {
                Some(intervention) => intervention,
                None => {
                    warn!(intervention_id = %intervention_id, "Intervention vanished before notification");
                    return Ok(());
                }
            };

            deps.notifier()
                .notify_status_changed(&intervention, from, to, changed_by, reason.as_deref())
                .await
        }

        InterventionEvent::ScheduleAccepted {
            intervention_id,
            provider_id,
        } => {
            ActivityLogEntry::record(
                "intervention",
                intervention_id.into_uuid(),
                "schedule_accepted",
                Some(provider_id),
                json!({}),
                &deps.db_pool,
            )
            .await?;

            let primary_manager =
                Assignment::find_primary_manager(intervention_id, &deps.db_pool).await?;
            if let Some(manager) = primary_manager {
                deps.notifier()
                    .notify_users(
                        &[manager.user_id],
                        "schedule_accepted",
                        "Schedule confirmed",
                        "The provider accepted the proposed date",
                        json!({ "intervention_id": intervention_id }),
                    )
                    .await?;
            }
            Ok(())
        }

        InterventionEvent::Split {
            parent_id,
            child_ids,
            actor,
            parent_cancelled,
        } => {
            ActivityLogEntry::record(
                "intervention",
                parent_id.into_uuid(),
                "split",
                Some(actor),
                json!({
                    "child_ids": child_ids,
                    "child_count": child_ids.len(),
                    "parent_cancelled": parent_cancelled,
                }),
                &deps.db_pool,
            )
            .await?;

            let managers = Assignment::manager_user_ids(parent_id, &deps.db_pool).await?;
            deps.notifier()
                .notify_users(
                    &managers,
                    "intervention_split",
                    "Intervention split",
                    &format!(
                        "{} follow-up interventions were created, one per provider",
                        child_ids.len()
                    ),
                    json!({ "parent_id": parent_id, "child_ids": child_ids }),
                )
                .await
        }

        InterventionEvent::ParticipationResolved {
            intervention_id,
            assignment_id,
            user_id,
            accepted,
        } => {
            let action = if accepted {
                "participation_confirmed"
            } else {
                "participation_declined"
            };
            ActivityLogEntry::record(
                "intervention",
                intervention_id.into_uuid(),
                action,
                Some(user_id),
                json!({ "assignment_id": assignment_id }),
                &deps.db_pool,
            )
            .await?;

            let managers = Assignment::manager_user_ids(intervention_id, &deps.db_pool).await?;
            deps.notifier()
                .notify_users(
                    &managers,
                    action,
                    if accepted {
                        "Participation confirmed"
                    } else {
                        "Participation declined"
                    },
                    "A participant answered their confirmation request",
                    json!({ "intervention_id": intervention_id, "user_id": user_id }),
                )
                .await
        }
    }
}
