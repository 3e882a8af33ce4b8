//! In-process outbound event queue for post-commit side effects.
//!
//! Actions publish fact events here only after their primary write has
//! committed; the worker then runs notification and activity-log effects
//! with at-most-once, no-retry semantics. An effect failure is logged and
//! discarded; it never changes the result the caller already received.
//!
//! # Usage
//!
//! Producers (domain actions):
//!   deps.outbox.publish(QuoteEvent::Rejected { .. });
//!
//! Consumer (one worker per process):
//!   tokio::spawn(worker.run());

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::domains::interventions::events::InterventionEvent;
use crate::domains::quotes::events::QuoteEvent;
use crate::domains::{interventions, quotes};
use crate::kernel::ServerDeps;

/// Envelope over every domain's fact events.
#[derive(Debug, Clone)]
pub enum OutboundEvent {
    Intervention(InterventionEvent),
    Quote(QuoteEvent),
}

impl From<InterventionEvent> for OutboundEvent {
    fn from(event: InterventionEvent) -> Self {
        OutboundEvent::Intervention(event)
    }
}

impl From<QuoteEvent> for OutboundEvent {
    fn from(event: QuoteEvent) -> Self {
        OutboundEvent::Quote(event)
    }
}

/// Sending half of the outbox. Cheap to clone; lives in `ServerDeps`.
#[derive(Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl Outbox {
    /// Create the queue. Returns the sender plus the receiver the worker owns.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue a fact event. Call only after the primary write committed.
    ///
    /// Never fails from the caller's perspective: a closed channel (worker
    /// gone during shutdown) drops the event with a warning.
    pub fn publish(&self, event: impl Into<OutboundEvent>) {
        let event = event.into();
        if self.tx.send(event).is_err() {
            warn!("outbox worker is gone; dropping post-commit event");
        }
    }
}

/// Receiving half of the outbox: routes events to domain effect handlers.
pub struct OutboxWorker {
    rx: mpsc::UnboundedReceiver<OutboundEvent>,
    deps: ServerDeps,
}

impl OutboxWorker {
    pub fn new(rx: mpsc::UnboundedReceiver<OutboundEvent>, deps: ServerDeps) -> Self {
        Self { rx, deps }
    }

    /// Consume events until the channel closes. Run on a dedicated task.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.handle(event).await;
        }
    }

    /// Spawn the worker on the runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process everything already enqueued, then return.
    ///
    /// Tests drive the worker with this instead of `spawn()` so side-effect
    /// assertions are deterministic.
    pub async fn drain_pending(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event).await;
        }
    }

    async fn handle(&self, event: OutboundEvent) {
        let outcome = match event {
            OutboundEvent::Intervention(event) => {
                interventions::effects::handle_event(event, &self.deps).await
            }
            OutboundEvent::Quote(event) => quotes::effects::handle_event(event, &self.deps).await,
        };

        // At-most-once: log and move on, never retry, never propagate.
        if let Err(err) = outcome {
            error!(error = %err, "post-commit side effect failed");
        }
    }
}
