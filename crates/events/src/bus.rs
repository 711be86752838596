//! The event bus: typed subscribe, synchronous in-order publish, audit log.
//!
//! ## Dispatch model
//!
//! The bus owns no threads, tasks or queues. `publish` runs on the caller's
//! task and does, in order:
//!
//! 1. append the event to the [`PublishedEventLog`]
//! 2. snapshot the handler list for the event's type (no subscribers is fine)
//! 3. await each handler in subscription order, checking the cancellation
//!    token before each one
//! 4. stop at the first failing handler and return its error
//!
//! ```text
//! Catalog::create_item ─► store.create ─► bus.publish(ItemCreated)
//!                                              ├─ log.append
//!                                              ├─ handler[0].handle ─► Billing store
//!                                              └─ handler[1].handle ─► ...
//! ```
//!
//! ## Delivery guarantees
//!
//! Exactly "ran once, or the publisher saw the failure". There is no retry,
//! no dead-lettering and no replay for handlers subscribed after an event was
//! published. A handler failure stops the handlers after it *for that publish
//! call only*; other event types and concurrent publishes are unaffected.
//!
//! ## Ordering
//!
//! - one publisher: log order == call order
//! - one event type: handlers always run in subscription order
//! - concurrent publishers: the log is one consistent total order, decided by
//!   the append step; no causal order across event types is promised
//!
//! ## Wiring
//!
//! Construct one bus at start-up, wrap it in `Arc`, and hand it to every
//! module. There is no global instance; tests build their own.

use std::sync::Arc;

use modulith_core::EventId;
use tokio_util::sync::CancellationToken;

use crate::{
    AuditRecord, Event, EventHandler, FnHandler, HandlerRegistry, HandlerResult, PublishError,
    PublishedEvent, PublishedEventLog,
};

/// What a successful `publish` did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub sequence: u64,
    pub event_id: EventId,
    pub handlers_invoked: usize,
}

#[derive(Debug, Default)]
pub struct EventBus {
    registry: HandlerRegistry,
    log: PublishedEventLog,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future `E`.
    ///
    /// Events of type `E` published before this call are never delivered to
    /// `handler`.
    pub fn subscribe<E, H>(&self, handler: H)
    where
        E: Event,
        H: EventHandler<E>,
    {
        self.subscribe_arc::<E>(Arc::new(handler));
    }

    pub fn subscribe_arc<E: Event>(&self, handler: Arc<dyn EventHandler<E>>) {
        let name = handler.name().to_string();
        let position = self.registry.register(handler);
        tracing::debug!(kind = E::KIND, handler = %name, position, "handler subscribed");
    }

    /// Register an async closure. `name` shows up in logs and errors.
    pub fn subscribe_fn<E, F, Fut>(&self, name: &'static str, f: F)
    where
        E: Event,
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.subscribe::<E, _>(FnHandler::new(name, f));
    }

    /// Log `event`, then run every handler subscribed to `E`, in order.
    ///
    /// See the module docs for the exact step order. On `Err`, the event is
    /// already in the log.
    pub async fn publish<E: Event>(
        &self,
        event: E,
        cancel: &CancellationToken,
    ) -> Result<PublishReceipt, PublishError> {
        let event = Arc::new(event);
        let entry = self.log.append(Arc::clone(&event));
        let sequence = entry.sequence();

        let Some(handlers) = self.registry.snapshot::<E>() else {
            tracing::debug!(kind = E::KIND, sequence, "published with no subscribers");
            return Ok(PublishReceipt {
                sequence,
                event_id: entry.event_id(),
                handlers_invoked: 0,
            });
        };

        let total = handlers.len();
        tracing::debug!(kind = E::KIND, sequence, handlers = total, "dispatching event");

        for (position, handler) in handlers.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    kind = E::KIND,
                    sequence,
                    completed = position,
                    total,
                    "publish cancelled between handlers"
                );
                return Err(PublishError::Cancelled {
                    kind: E::KIND,
                    sequence,
                    completed: position,
                    total,
                });
            }

            if let Err(source) = handler.handle(event.as_ref()).await {
                tracing::warn!(
                    kind = E::KIND,
                    sequence,
                    position,
                    handler = handler.name(),
                    error = %source,
                    "handler failed; skipping remaining handlers"
                );
                return Err(PublishError::Handler {
                    kind: E::KIND,
                    sequence,
                    position,
                    handler: handler.name().to_string(),
                    source,
                });
            }
        }

        Ok(PublishReceipt {
            sequence,
            event_id: entry.event_id(),
            handlers_invoked: total,
        })
    }

    /// Every event published so far, in log order.
    pub fn published_events(&self) -> Vec<Arc<PublishedEvent>> {
        self.log.snapshot()
    }

    /// Every published `E`, in log order.
    pub fn published_events_of<E: Event>(&self) -> Vec<E> {
        self.log
            .collect_where(PublishedEvent::is::<E>)
            .iter()
            .filter_map(|entry| entry.downcast_ref::<E>().cloned())
            .collect()
    }

    pub fn published_count(&self) -> usize {
        self.log.len()
    }

    /// Serializable view of the log for operator tooling.
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.log
            .snapshot()
            .iter()
            .map(|entry| entry.to_audit_record())
            .collect()
    }

    pub fn handler_count<E: Event>(&self) -> usize {
        self.registry.len_of::<E>()
    }

    /// `(kind, handler count)` for every subscribed event type.
    pub fn subscriptions(&self) -> Vec<(&'static str, usize)> {
        self.registry.kinds()
    }
}
