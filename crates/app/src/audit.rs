//! Operator-facing audit view of the published event log.

use serde::Serialize;

use modulith_events::{AuditRecord, EventBus};

#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub kind: &'static str,
    pub handlers: usize,
}

/// Everything an audit endpoint returns: the full log plus who is listening.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub event_count: usize,
    pub events: Vec<AuditRecord>,
    pub subscriptions: Vec<Subscription>,
}

impl AuditReport {
    pub fn from_bus(bus: &EventBus) -> Self {
        let events = bus.audit_records();
        Self {
            event_count: events.len(),
            events,
            subscriptions: bus
                .subscriptions()
                .into_iter()
                .map(|(kind, handlers)| Subscription { kind, handlers })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
