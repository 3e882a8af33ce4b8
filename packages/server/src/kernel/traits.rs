// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "approve this quote") lives in domain actions that
// use these traits through `ServerDeps`.
//
// Naming convention: Base* for trait names (e.g., BasePushNotificationService)

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::common::utils::ExpoClient;

// =============================================================================
// Push Notification Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BasePushNotificationService: Send + Sync {
    /// Send a push notification to a push token
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> Result<()>;

    /// Send multiple notifications in batch
    async fn send_batch(
        &self,
        notifications: Vec<(&str, &str, &str, serde_json::Value)>,
    ) -> Result<()>;
}

#[async_trait]
impl BasePushNotificationService for ExpoClient {
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> Result<()> {
        ExpoClient::send_notification(self, push_token, title, body, data).await
    }

    async fn send_batch(
        &self,
        notifications: Vec<(&str, &str, &str, serde_json::Value)>,
    ) -> Result<()> {
        ExpoClient::send_batch(self, notifications).await
    }
}

// =============================================================================
// Mailer Trait (Infrastructure - delivery transport is out of scope)
// =============================================================================

#[async_trait]
pub trait BaseMailerService: Send + Sync {
    /// Send an email to a single recipient
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Mailer that only records the send in the logs.
///
/// The real transport sits behind the platform's mail relay; this keeps the
/// dispatch path exercised in environments without one.
pub struct LoggingMailer {
    sender: String,
}

impl LoggingMailer {
    pub fn new(sender: String) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl BaseMailerService for LoggingMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        info!(from = %self.sender, to = %to, subject = %subject, "Email queued");
        Ok(())
    }
}
