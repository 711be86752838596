//! In-process, typed publish/subscribe for a modular monolith.
//!
//! Modules never reference each other directly. A producer publishes an
//! [`Event`] after its own state change commits; consumers in other modules
//! [`subscribe`](EventBus::subscribe) at start-up and derive their own state
//! from the event payload. Every published event lands in an append-only
//! audit log.

pub mod bus;
pub mod error;
pub mod event;
pub mod handler;
pub mod log;
pub mod registry;

pub use bus::{EventBus, PublishReceipt};
pub use error::PublishError;
pub use event::Event;
pub use handler::{EventHandler, FnHandler, HandlerResult};
pub use log::{AuditRecord, PublishedEvent, PublishedEventLog};
pub use registry::{HandlerList, HandlerRegistry};

/// Re-exported so modules can build cancellation signals without a direct
/// dependency on `tokio-util`.
pub use tokio_util::sync::CancellationToken;
