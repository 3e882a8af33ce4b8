//! Notifications domain - in-app rows plus push/email fan-out
//!
//! Delivery transports live behind kernel traits; this domain owns the
//! durable rows and the dispatch contract the other domains call.

pub mod dispatcher;
pub mod models;

pub use dispatcher::{NotificationDispatcher, QuoteRejectedNotification};
pub use models::{Notification, Recipient};
