use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{InstructionId, InterventionId, UserId};

/// Work instructions addressed to one provider of an intervention.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInstruction {
    pub id: InstructionId,
    pub intervention_id: InterventionId,
    pub provider_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ProviderInstruction {
    pub async fn insert(&self, executor: impl PgExecutor<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO provider_instructions (id, intervention_id, provider_id, body)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(self.id)
        .bind(self.intervention_id)
        .bind(self.provider_id)
        .bind(&self.body)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Instructions addressed to one provider
    pub async fn find_for_provider(
        intervention_id: InterventionId,
        provider_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM provider_instructions
             WHERE intervention_id = $1 AND provider_id = $2
             ORDER BY created_at",
        )
        .bind(intervention_id)
        .bind(provider_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}
