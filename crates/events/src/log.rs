//! Published event log (audit trail).
//!
//! Append-only, in-memory, process-lifetime. The log is a persistent
//! singly-linked list of immutable links, newest first. Appending builds one
//! link and swaps the head under a short exclusive lock, which is also where
//! the sequence number is assigned, so the log is a single total order even
//! with concurrent publishers. Readers clone the head `Arc` under the shared
//! lock and walk the chain after releasing it; a long read never holds up an
//! append.

use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use modulith_core::EventId;

use crate::Event;

/// One entry of the log.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    sequence: u64,
    event_id: EventId,
    kind: &'static str,
    version: u32,
    occurred_at: DateTime<Utc>,
    payload: Result<JsonValue, String>,
    value: Arc<dyn Any + Send + Sync>,
}

impl PublishedEvent {
    /// 1-based position in the log.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// JSON rendering of the event taken at publish time, or `None` if the
    /// event has no JSON form (see [`payload_error`](Self::payload_error)).
    pub fn payload(&self) -> Option<&JsonValue> {
        self.payload.as_ref().ok()
    }

    pub fn payload_error(&self) -> Option<&str> {
        self.payload.as_ref().err().map(String::as_str)
    }

    /// The event as originally published, if it is an `E`.
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.value.downcast_ref::<E>()
    }

    pub fn is<E: Event>(&self) -> bool {
        self.value.is::<E>()
    }

    pub fn to_audit_record(&self) -> AuditRecord {
        AuditRecord {
            sequence: self.sequence,
            event_id: self.event_id,
            kind: self.kind.to_string(),
            version: self.version,
            occurred_at: self.occurred_at,
            payload: self.payload().cloned(),
            payload_error: self.payload_error().map(str::to_string),
        }
    }
}

/// Operator-facing, serializable view of a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub sequence: u64,
    pub event_id: EventId,
    pub kind: String,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
    pub payload: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_error: Option<String>,
}

struct Link {
    entry: Arc<PublishedEvent>,
    prev: Option<Arc<Link>>,
}

impl Drop for Link {
    // Unlink iteratively; the default drop would recurse once per entry.
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(link) = prev {
            match Arc::try_unwrap(link) {
                Ok(mut link) => prev = link.prev.take(),
                Err(_) => break,
            }
        }
    }
}

#[derive(Default)]
pub struct PublishedEventLog {
    head: RwLock<Option<Arc<Link>>>,
}

impl PublishedEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event` and return the stored entry.
    ///
    /// Never fails. An event whose `Serialize` output has no JSON form (a map
    /// with non-string keys, say) is logged with a payload error instead.
    pub fn append<E: Event>(&self, event: Arc<E>) -> Arc<PublishedEvent> {
        let payload = serde_json::to_value(event.as_ref()).map_err(|err| {
            tracing::warn!(kind = E::KIND, error = %err, "event has no JSON audit payload");
            err.to_string()
        });

        let mut head = self.head.write().unwrap_or_else(PoisonError::into_inner);

        let entry = Arc::new(PublishedEvent {
            sequence: head.as_ref().map_or(0, |link| link.entry.sequence) + 1,
            event_id: EventId::new(),
            kind: E::KIND,
            version: event.version(),
            occurred_at: event.occurred_at(),
            payload,
            value: event,
        });
        let prev = head.take();
        *head = Some(Arc::new(Link {
            entry: Arc::clone(&entry),
            prev,
        }));
        entry
    }

    /// Ordered copy of the log as of now. Entries appended afterwards are not
    /// visible in the returned vector.
    pub fn snapshot(&self) -> Vec<Arc<PublishedEvent>> {
        self.collect_where(|_| true)
    }

    /// Like [`snapshot`](Self::snapshot), keeping only entries matching `keep`.
    pub fn collect_where(&self, keep: impl Fn(&PublishedEvent) -> bool) -> Vec<Arc<PublishedEvent>> {
        let head = self.head();
        let mut entries = Vec::with_capacity(head.as_ref().map_or(0, |l| l.entry.sequence as usize));

        let mut cursor = head.as_deref();
        while let Some(link) = cursor {
            if keep(&link.entry) {
                entries.push(Arc::clone(&link.entry));
            }
            cursor = link.prev.as_deref();
        }
        entries.reverse();
        entries
    }

    pub fn len(&self) -> usize {
        self.head().map_or(0, |link| link.entry.sequence as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn head(&self) -> Option<Arc<Link>> {
        self.head
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl core::fmt::Debug for PublishedEventLog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PublishedEventLog")
            .field("len", &self.len())
            .finish()
    }
}
