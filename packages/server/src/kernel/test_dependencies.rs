// Test dependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{BaseMailerService, BasePushNotificationService};

// =============================================================================
// Mock Push Service
// =============================================================================

/// A push notification captured by the mock
#[derive(Debug, Clone)]
pub struct PushCall {
    pub push_token: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

#[derive(Default)]
pub struct MockPushService {
    calls: Arc<Mutex<Vec<PushCall>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockPushService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (for side-effect isolation tests)
    pub fn failing(self) -> Self {
        *self.fail.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<PushCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePushNotificationService for MockPushService {
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("push transport unavailable");
        }
        self.calls.lock().unwrap().push(PushCall {
            push_token: push_token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data,
        });
        Ok(())
    }

    async fn send_batch(
        &self,
        notifications: Vec<(&str, &str, &str, serde_json::Value)>,
    ) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("push transport unavailable");
        }
        let mut calls = self.calls.lock().unwrap();
        for (token, title, body, data) in notifications {
            calls.push(PushCall {
                push_token: token.to_string(),
                title: title.to_string(),
                body: body.to_string(),
                data,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Mock Mailer
// =============================================================================

/// An email captured by the mock
#[derive(Debug, Clone)]
pub struct MailCall {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct MockMailer {
    calls: Arc<Mutex<Vec<MailCall>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (for side-effect isolation tests)
    pub fn failing(self) -> Self {
        *self.fail.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<MailCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseMailerService for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("mail relay unavailable");
        }
        self.calls.lock().unwrap().push(MailCall {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
