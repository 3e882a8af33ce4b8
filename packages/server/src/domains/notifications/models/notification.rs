use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgExecutor;

use crate::common::{NotificationId, UserId};

/// In-app notification row.
///
/// The in-app insert is the durable record; push and email ride alongside
/// as best-effort channels.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub metadata: JsonValue,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Insert one notification row per user
    pub async fn insert_for_users(
        user_ids: &[UserId],
        kind: &str,
        title: &str,
        body: &str,
        metadata: &JsonValue,
        executor: impl PgExecutor<'_>,
    ) -> Result<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, title, body, metadata)
             SELECT gen_random_uuid(), t.user_id, $2, $3, $4, $5
             FROM unnest($1::uuid[]) AS t(user_id)",
        )
        .bind(user_ids.to_vec())
        .bind(kind)
        .bind(title)
        .bind(body)
        .bind(metadata)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// A user's notifications, newest first
    pub async fn find_for_user(
        user_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}
