//! Quote domain effects - post-commit side effects
//!
//! Runs on the outbox worker after the quote write committed. Best-effort:
//! failures are logged by the worker, never surfaced to the action caller.

use anyhow::Result;
use serde_json::json;
use std::collections::HashSet;
use tracing::warn;

use crate::common::UserId;
use crate::domains::interventions::models::{
    ActivityLogEntry, Assignment, BuildingManager, Intervention, InterventionStatus,
};
use crate::domains::notifications::QuoteRejectedNotification;
use crate::domains::quotes::events::QuoteEvent;
use crate::kernel::ServerDeps;

/// Route one quote fact event to its side effects.
pub async fn handle_event(event: QuoteEvent, deps: &ServerDeps) -> Result<()> {
    match event {
        QuoteEvent::Submitted {
            quote_id,
            intervention_id,
            provider_id,
        } => {
            ActivityLogEntry::record(
                "quote",
                quote_id.into_uuid(),
                "submitted",
                Some(provider_id),
                json!({ "intervention_id": intervention_id }),
                &deps.db_pool,
            )
            .await?;

            let managers = Assignment::manager_user_ids(intervention_id, &deps.db_pool).await?;
            deps.notifier()
                .notify_users(
                    &managers,
                    "quote_submitted",
                    "New quote received",
                    "A provider submitted a quote",
                    json!({ "quote_id": quote_id, "intervention_id": intervention_id }),
                )
                .await
        }

        QuoteEvent::Sent {
            quote_id,
            intervention_id,
            provider_id,
        } => {
            ActivityLogEntry::record(
                "quote",
                quote_id.into_uuid(),
                "sent",
                Some(provider_id),
                json!({ "intervention_id": intervention_id }),
                &deps.db_pool,
            )
            .await
            .map(|_| ())
        }

        QuoteEvent::Approved {
            quote_id,
            intervention_id,
            provider_id,
            approved_by,
            comments,
            competitors_rejected,
        } => {
            ActivityLogEntry::record(
                "quote",
                quote_id.into_uuid(),
                "approved",
                Some(approved_by),
                json!({
                    "intervention_id": intervention_id,
                    "comments": comments,
                    "competitors_rejected": competitors_rejected,
                }),
                &deps.db_pool,
            )
            .await?;

            // The winning provider hears about it directly.
            deps.notifier()
                .notify_users(
                    &[provider_id],
                    "quote_accepted",
                    "Quote accepted",
                    "Your quote was selected; scheduling starts now",
                    json!({ "quote_id": quote_id, "intervention_id": intervention_id }),
                )
                .await?;

            // Everyone else sees the intervention move to scheduling.
            match Intervention::find_by_id(intervention_id, &deps.db_pool).await? {
                Some(intervention) => {
                    deps.notifier()
                        .notify_status_changed(
                            &intervention,
                            InterventionStatus::QuoteRequested,
                            InterventionStatus::Scheduling,
                            approved_by,
                            None,
                        )
                        .await
                }
                None => {
                    warn!(intervention_id = %intervention_id, "Intervention vanished before notification");
                    Ok(())
                }
            }
        }

        QuoteEvent::Rejected {
            quote_id,
            intervention_id,
            provider_id,
            rejected_by,
            reason,
        } => {
            ActivityLogEntry::record(
                "quote",
                quote_id.into_uuid(),
                "rejected",
                Some(rejected_by),
                json!({ "intervention_id": intervention_id, "reason": reason }),
                &deps.db_pool,
            )
            .await?;

            deps.notifier()
                .notify_quote_rejected(QuoteRejectedNotification {
                    quote_id,
                    intervention_id,
                    provider_id,
                    reason,
                })
                .await
        }

        QuoteEvent::Cancelled {
            quote_id,
            intervention_id,
            provider_id,
        } => {
            ActivityLogEntry::record(
                "quote",
                quote_id.into_uuid(),
                "cancelled",
                Some(provider_id),
                json!({ "intervention_id": intervention_id }),
                &deps.db_pool,
            )
            .await?;

            // Managers assigned to the intervention plus the building's
            // managers, deduplicated by user id.
            let mut managers =
                Assignment::manager_user_ids(intervention_id, &deps.db_pool).await?;
            if let Some(intervention) =
                Intervention::find_by_id(intervention_id, &deps.db_pool).await?
            {
                managers
                    .extend(BuildingManager::manager_ids(intervention.building_id, &deps.db_pool).await?);
            }
            let mut seen = HashSet::new();
            let managers: Vec<UserId> = managers
                .into_iter()
                .filter(|id| seen.insert(*id))
                .collect();

            deps.notifier()
                .notify_users(
                    &managers,
                    "quote_cancelled",
                    "Quote withdrawn",
                    "A provider withdrew their quote",
                    json!({ "quote_id": quote_id, "intervention_id": intervention_id }),
                )
                .await
        }
    }
}
