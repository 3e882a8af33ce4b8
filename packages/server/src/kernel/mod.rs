//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod outbox;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use outbox::{Outbox, OutboundEvent, OutboxWorker};
pub use test_dependencies::{MockMailer, MockPushService};
pub use traits::*;
