use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{CommentId, InterventionId, UserId};

/// Comment on an intervention. Internal comments are only shown to managers.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct InterventionComment {
    pub id: CommentId,
    pub intervention_id: InterventionId,
    pub author_id: Option<UserId>,
    pub body: String,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

impl InterventionComment {
    /// Insert a comment
    pub async fn insert(
        intervention_id: InterventionId,
        author_id: Option<UserId>,
        body: &str,
        is_internal: bool,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO intervention_comments (id, intervention_id, author_id, body, is_internal)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(CommentId::new())
        .bind(intervention_id)
        .bind(author_id)
        .bind(body)
        .bind(is_internal)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Comments of an intervention, oldest first
    pub async fn find_for_intervention(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM intervention_comments
             WHERE intervention_id = $1
             ORDER BY created_at",
        )
        .bind(intervention_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}
