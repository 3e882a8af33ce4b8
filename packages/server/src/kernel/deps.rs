//! Server dependencies for actions and effects (using traits for testability)
//!
//! This module provides the central dependency container handed to all domain
//! actions and effect handlers. External services sit behind trait
//! abstractions so tests can swap in call-capturing mocks.

use sqlx::PgPool;
use std::sync::Arc;

use crate::common::utils::ExpoClient;
use crate::config::Config;
use crate::domains::notifications::NotificationDispatcher;
use crate::kernel::outbox::{Outbox, OutboxWorker};
use crate::kernel::{BaseMailerService, BasePushNotificationService, LoggingMailer};

/// Server dependencies accessible to actions and effects.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub push_service: Arc<dyn BasePushNotificationService>,
    pub mailer: Arc<dyn BaseMailerService>,
    /// Post-commit event queue; actions publish fact events here.
    pub outbox: Outbox,
}

impl ServerDeps {
    /// Wire the dependency container from configuration.
    ///
    /// Returns the deps plus the outbox worker; callers decide whether to
    /// `spawn()` the worker (server) or drive it manually (tests).
    pub fn init(config: &Config, db_pool: PgPool) -> (Self, OutboxWorker) {
        Self::with_services(
            db_pool,
            Arc::new(ExpoClient::new(config.expo_access_token.clone())),
            Arc::new(LoggingMailer::new(config.mail_sender.clone())),
        )
    }

    /// Wire the dependency container with explicit service implementations.
    pub fn with_services(
        db_pool: PgPool,
        push_service: Arc<dyn BasePushNotificationService>,
        mailer: Arc<dyn BaseMailerService>,
    ) -> (Self, OutboxWorker) {
        let (outbox, receiver) = Outbox::channel();
        let deps = Self {
            db_pool,
            push_service,
            mailer,
            outbox,
        };
        let worker = OutboxWorker::new(receiver, deps.clone());
        (deps, worker)
    }

    /// Notification dispatcher bound to this container's services.
    pub fn notifier(&self) -> NotificationDispatcher {
        NotificationDispatcher::new(
            self.db_pool.clone(),
            self.push_service.clone(),
            self.mailer.clone(),
        )
    }
}
