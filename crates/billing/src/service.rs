use std::sync::Arc;

use modulith_catalog::ItemId;
use modulith_core::{InMemoryStore, Store};

use crate::{Invoice, InvoiceReference};

/// Read side of the billing module.
///
/// Invoices are only ever written by [`BillingProjection`](crate::BillingProjection);
/// this service shares the same store and exposes queries over it.
#[derive(Debug)]
pub struct BillingService<S = InMemoryStore<Invoice>> {
    store: Arc<S>,
}

impl<S> BillingService<S>
where
    S: Store<Invoice>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn get_invoice(&self, reference: &InvoiceReference) -> Option<Invoice> {
        self.store.get(reference)
    }

    pub fn invoice_for_item(&self, item_id: ItemId) -> Option<Invoice> {
        self.store.get(&InvoiceReference::for_item(item_id))
    }

    pub fn list_invoices(&self) -> Vec<Invoice> {
        self.store.list()
    }

    pub fn invoice_count(&self) -> usize {
        self.store.len()
    }
}
