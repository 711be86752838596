//! Subscriber side of the bus.

use std::future::Future;

use async_trait::async_trait;

use crate::Event;

/// Outcome of a single handler invocation.
///
/// Handlers belong to other modules, so their failures are opaque to the bus:
/// `anyhow::Error` carries whatever the subscribing module produced.
pub type HandlerResult = anyhow::Result<()>;

/// Reacts to one published event of type `E`.
///
/// Handlers run on the publisher's task, one after another, in subscription
/// order. A handler that suspends (e.g. on an async store write) suspends the
/// publisher with it. Returning `Err` stops the remaining handlers for that
/// publish call and surfaces the error to the publisher.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync + 'static {
    async fn handle(&self, event: &E) -> HandlerResult;

    /// Name used in logs and in `PublishError::Handler`.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapts an async closure into an [`EventHandler`].
///
/// The closure receives its own clone of the event so the returned future can
/// be `'static`.
pub struct FnHandler<F> {
    name: &'static str,
    f: F,
}

impl<F> FnHandler<F> {
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> core::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<E, F, Fut> EventHandler<E> for FnHandler<F>
where
    E: Event,
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, event: &E) -> HandlerResult {
        (self.f)(event.clone()).await
    }

    fn name(&self) -> &str {
        self.name
    }
}
