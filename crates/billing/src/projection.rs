//! Billing projection: `ItemCreated` → invoice.
//!
//! Idempotent by construction: the invoice reference is a function of the
//! item id, and the store rejects a second record with the same reference.
//! A duplicate delivery is therefore reported as `Applied::AlreadyInvoiced`
//! instead of an error.

use std::sync::Arc;

use async_trait::async_trait;

use modulith_catalog::ItemCreated;
use modulith_core::{DomainError, DomainResult, Store};
use modulith_events::{EventBus, EventHandler, HandlerResult};

use crate::{Invoice, InvoiceReference};

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Created(Invoice),
    AlreadyInvoiced(InvoiceReference),
}

#[derive(Debug)]
pub struct BillingProjection<S> {
    store: Arc<S>,
}

impl<S> BillingProjection<S>
where
    S: Store<Invoice> + 'static,
{
    pub const NAME: &'static str = "billing.invoice_projection";

    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Subscribe a projection writing into `store` to `ItemCreated` on `bus`.
    pub fn register(bus: &EventBus, store: Arc<S>) {
        bus.subscribe::<ItemCreated, _>(Self::new(store));
    }

    pub fn apply(&self, event: &ItemCreated) -> DomainResult<Applied> {
        let invoice = Invoice::for_item_created(event)?;
        let reference = invoice.reference().clone();

        match self.store.create(invoice) {
            Ok(invoice) => {
                tracing::info!(
                    reference = %invoice.reference(),
                    item_id = %invoice.source_item_id(),
                    amount = %invoice.amount(),
                    "invoice created"
                );
                Ok(Applied::Created(invoice))
            }
            Err(DomainError::Conflict(_)) => {
                tracing::debug!(%reference, item_id = %event.item_id, "item already invoiced; skipping");
                Ok(Applied::AlreadyInvoiced(reference))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<S> EventHandler<ItemCreated> for BillingProjection<S>
where
    S: Store<Invoice> + 'static,
{
    async fn handle(&self, event: &ItemCreated) -> HandlerResult {
        self.apply(event)?;
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
