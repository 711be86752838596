use chrono::{DateTime, Utc};
use serde::Serialize;

/// A domain event: an immutable fact about something that already happened in
/// one module.
///
/// Events are:
/// - **immutable** (treat them as facts; the bus only ever hands out `&E`)
/// - **kind-tagged** (`KIND` is the stable name other modules subscribe to)
/// - **self-contained** (carry every field a consumer needs, never a handle
///   into the producing module)
///
/// The `Serialize` bound exists so every published event can be rendered into
/// the audit log.
pub trait Event: Clone + core::fmt::Debug + Serialize + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "catalog.item.created").
    const KIND: &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Schema version for this event type.
    fn version(&self) -> u32 {
        1
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }
}
