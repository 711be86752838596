use std::sync::Arc;

use modulith_billing::{BillingProjection, BillingService, Invoice};
use modulith_catalog::{CatalogError, CatalogItem, CatalogService};
use modulith_core::InMemoryStore;
use modulith_events::{CancellationToken, EventBus};

use crate::{AuditReport, SeedItem};

/// All modules of the process, wired around one event bus.
///
/// Construction order matters only in one way: projections subscribe here,
/// before any producer can publish, so no start-up event is missed.
#[derive(Debug)]
pub struct AppServices {
    bus: Arc<EventBus>,
    catalog: CatalogService,
    billing: BillingService,
}

/// What happened to one seed item.
#[derive(Debug)]
pub enum SeedOutcome {
    Created(CatalogItem),
    Failed { name: String, error: CatalogError },
}

impl AppServices {
    pub fn new() -> Self {
        let bus = Arc::new(EventBus::new());

        let invoices: Arc<InMemoryStore<Invoice>> = Arc::new(InMemoryStore::new());
        BillingProjection::register(&bus, Arc::clone(&invoices));
        let billing = BillingService::new(invoices);

        let catalog = CatalogService::new(InMemoryStore::new(), Arc::clone(&bus));

        Self {
            bus,
            catalog,
            billing,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn billing(&self) -> &BillingService {
        &self.billing
    }

    /// Create every seed item through the catalog. A failing item is
    /// reported and does not stop the remaining ones.
    pub async fn seed(&self, items: &[SeedItem], cancel: &CancellationToken) -> Vec<SeedOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());
        for seed in items {
            let outcome = match self.catalog.create_item(seed.name.clone(), seed.price, cancel).await {
                Ok(item) => SeedOutcome::Created(item),
                Err(error) => {
                    tracing::error!(name = %seed.name, error = %error, "seed item failed");
                    SeedOutcome::Failed {
                        name: seed.name.clone(),
                        error,
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    pub fn audit_report(&self) -> AuditReport {
        AuditReport::from_bus(&self.bus)
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new()
    }
}
