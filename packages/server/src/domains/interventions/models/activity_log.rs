use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::common::{ActivityLogId, UserId};

/// Append-only activity log.
///
/// Written post-commit as a side effect of every state-changing operation;
/// the core never reads it back (queries below exist for the test suite).
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: ActivityLogId,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: String,
    pub actor_id: Option<UserId>,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Record an action against an entity
    pub async fn record(
        entity_type: &str,
        entity_id: Uuid,
        action: &str,
        actor_id: Option<UserId>,
        metadata: JsonValue,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO activity_logs (id, entity_type, entity_id, action, actor_id, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(ActivityLogId::new())
        .bind(entity_type)
        .bind(entity_id)
        .bind(action)
        .bind(actor_id)
        .bind(metadata)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Entries for one entity, newest first
    pub async fn find_for_entity(
        entity_type: &str,
        entity_id: Uuid,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM activity_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at DESC",
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}
