use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{InterventionId, TimeSlotId, UserId};

/// Proposed or agreed time window for an intervention.
///
/// `provider_id` scopes a slot to one provider in multi-provider mode.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub intervention_id: InterventionId,
    pub provider_id: Option<UserId>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    pub async fn insert(&self, executor: impl PgExecutor<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO intervention_time_slots (id, intervention_id, provider_id, starts_at, ends_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(self.id)
        .bind(self.intervention_id)
        .bind(self.provider_id)
        .bind(self.starts_at)
        .bind(self.ends_at)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Slots addressed to one provider (shared slots excluded)
    pub async fn find_for_provider(
        intervention_id: InterventionId,
        provider_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM intervention_time_slots
             WHERE intervention_id = $1 AND provider_id = $2
             ORDER BY starts_at",
        )
        .bind(intervention_id)
        .bind(provider_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// All slots of an intervention
    pub async fn find_for_intervention(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM intervention_time_slots
             WHERE intervention_id = $1
             ORDER BY starts_at",
        )
        .bind(intervention_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}
