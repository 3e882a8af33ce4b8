//! Notification dispatcher - the single fan-out point
//!
//! Inserts the durable in-app rows first, then pushes and mails
//! best-effort. A channel failure is logged and swallowed so one broken
//! transport never silences the others.

use anyhow::Result;
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::common::{InterventionId, QuoteId, UserId};
use crate::domains::interventions::models::{Assignment, Intervention, InterventionStatus};
use crate::domains::notifications::models::{Notification, Recipient};
use crate::kernel::{BaseMailerService, BasePushNotificationService};

/// Payload for the dedicated quote-rejection notification.
#[derive(Debug, Clone)]
pub struct QuoteRejectedNotification {
    pub quote_id: QuoteId,
    pub intervention_id: InterventionId,
    pub provider_id: UserId,
    pub reason: String,
}

pub struct NotificationDispatcher {
    pool: PgPool,
    push: Arc<dyn BasePushNotificationService>,
    mailer: Arc<dyn BaseMailerService>,
}

impl NotificationDispatcher {
    pub fn new(
        pool: PgPool,
        push: Arc<dyn BasePushNotificationService>,
        mailer: Arc<dyn BaseMailerService>,
    ) -> Self {
        Self { pool, push, mailer }
    }

    /// Notify a set of users over every channel they can receive.
    pub async fn notify_users(
        &self,
        user_ids: &[UserId],
        kind: &str,
        title: &str,
        body: &str,
        metadata: JsonValue,
    ) -> Result<()> {
        if user_ids.is_empty() {
            return Ok(());
        }

        Notification::insert_for_users(user_ids, kind, title, body, &metadata, &self.pool).await?;

        let recipients = Recipient::load_many(user_ids, &self.pool).await?;

        let pushes: Vec<(&str, &str, &str, JsonValue)> = recipients
            .iter()
            .filter_map(|r| r.expo_push_token.as_deref())
            .map(|token| (token, title, body, metadata.clone()))
            .collect();
        if let Err(err) = self.push.send_batch(pushes).await {
            error!(error = %err, kind = kind, "Push dispatch failed");
        }

        let email_sends = recipients
            .iter()
            .filter_map(|r| r.email.as_deref())
            .map(|email| async move { (email, self.mailer.send(email, title, body).await) });
        for (email, result) in futures::future::join_all(email_sends).await {
            if let Err(err) = result {
                error!(error = %err, to = email, "Email dispatch failed");
            }
        }

        Ok(())
    }

    /// Tell every participant (except the actor) about a status change.
    pub async fn notify_status_changed(
        &self,
        intervention: &Intervention,
        from: InterventionStatus,
        to: InterventionStatus,
        changed_by: UserId,
        reason: Option<&str>,
    ) -> Result<()> {
        let recipients: Vec<UserId> =
            Assignment::participant_user_ids(intervention.id, &self.pool)
                .await?
                .into_iter()
                .filter(|id| *id != changed_by)
                .collect();

        let body = match reason {
            Some(reason) => format!(
                "\"{}\" moved from {} to {}: {}",
                intervention.title, from, to, reason
            ),
            None => format!("\"{}\" moved from {} to {}", intervention.title, from, to),
        };

        self.notify_users(
            &recipients,
            "intervention_status",
            "Intervention update",
            &body,
            json!({
                "intervention_id": intervention.id,
                "from": from,
                "to": to,
                "reason": reason,
            }),
        )
        .await
    }

    /// Tell a provider their quote was rejected (in-app + push + email).
    pub async fn notify_quote_rejected(
        &self,
        payload: QuoteRejectedNotification,
    ) -> Result<()> {
        self.notify_users(
            &[payload.provider_id],
            "quote_rejected",
            "Quote not selected",
            &format!("Your quote was rejected: {}", payload.reason),
            json!({
                "quote_id": payload.quote_id,
                "intervention_id": payload.intervention_id,
                "reason": payload.reason,
            }),
        )
        .await
    }
}
