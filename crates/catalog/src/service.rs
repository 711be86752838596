use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use modulith_core::{InMemoryStore, Store};
use modulith_events::{CancellationToken, EventBus};

use crate::{CatalogError, CatalogItem, ItemCreated, ItemId};

/// Catalog application service (producer side).
///
/// Every state change is persisted first and published second; the bus is
/// injected at construction time.
#[derive(Debug)]
pub struct CatalogService<S = InMemoryStore<CatalogItem>> {
    store: S,
    bus: Arc<EventBus>,
}

impl<S> CatalogService<S>
where
    S: Store<CatalogItem>,
{
    pub fn new(store: S, bus: Arc<EventBus>) -> Self {
        Self { store, bus }
    }

    /// Create an item, then publish [`ItemCreated`].
    ///
    /// A publish failure is returned as [`CatalogError::Publish`]; the item
    /// stays in the store.
    pub async fn create_item(
        &self,
        name: impl Into<String>,
        price: Decimal,
        cancel: &CancellationToken,
    ) -> Result<CatalogItem, CatalogError> {
        let item = CatalogItem::new(ItemId::generate(), name, price, Utc::now())?;
        let item = self.store.create(item)?;
        tracing::info!(item_id = %item.item_id(), name = item.name(), price = %item.price(), "catalog item created");

        self.bus
            .publish(ItemCreated::from(&item), cancel)
            .await
            .map_err(|source| CatalogError::Publish {
                item_id: item.item_id(),
                source,
            })?;

        Ok(item)
    }

    pub fn get_item(&self, id: &ItemId) -> Option<CatalogItem> {
        self.store.get(id)
    }

    pub fn list_items(&self) -> Vec<CatalogItem> {
        self.store.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use anyhow::anyhow;
    use modulith_core::DomainError;
    use modulith_events::PublishError;
    use rust_decimal_macros::dec;

    fn setup() -> (CatalogService<Arc<InMemoryStore<CatalogItem>>>, Arc<InMemoryStore<CatalogItem>>, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let store = Arc::new(InMemoryStore::new());
        let service = CatalogService::new(Arc::clone(&store), Arc::clone(&bus));
        (service, store, bus)
    }

    #[tokio::test]
    async fn create_item_stores_and_publishes_once() {
        let (service, store, bus) = setup();

        let item = service
            .create_item("Widget", dec!(9.99), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(store.get(&item.item_id()), Some(item.clone()));
        let published = bus.published_events_of::<ItemCreated>();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].item_id, item.item_id());
        assert_eq!(published[0].price, dec!(9.99));
    }

    #[tokio::test]
    async fn item_is_stored_before_subscribers_run() {
        let (service, store, bus) = setup();
        let seen_in_store = Arc::new(Mutex::new(None));
        {
            let store = Arc::clone(&store);
            let seen_in_store = Arc::clone(&seen_in_store);
            bus.subscribe_fn::<ItemCreated, _, _>("store-probe", move |event| {
                let found = store.get(&event.item_id).is_some();
                let seen_in_store = Arc::clone(&seen_in_store);
                async move {
                    *seen_in_store.lock().unwrap() = Some(found);
                    Ok(())
                }
            });
        }

        service
            .create_item("Widget", dec!(1), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*seen_in_store.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn invalid_item_is_neither_stored_nor_published() {
        let (service, store, bus) = setup();

        let err = service
            .create_item("  ", dec!(5), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Domain(DomainError::Validation(_))));
        assert!(store.is_empty());
        assert_eq!(bus.published_count(), 0);
    }

    #[tokio::test]
    async fn subscriber_failure_reaches_the_caller_and_item_is_kept() {
        let (service, store, bus) = setup();
        bus.subscribe_fn::<ItemCreated, _, _>("rejects", |_| async {
            Err(anyhow!("downstream projection rejected the item"))
        });

        let err = service
            .create_item("Widget", dec!(2.50), &CancellationToken::new())
            .await
            .unwrap_err();

        let item_id = match err {
            CatalogError::Publish {
                item_id,
                source: PublishError::Handler { .. },
            } => item_id,
            other => panic!("Expected Publish(Handler), got {other:?}"),
        };
        assert!(service.get_item(&item_id).is_some());
        assert_eq!(store.len(), 1);
        assert_eq!(bus.published_count(), 1);
    }

    #[tokio::test]
    async fn list_items_returns_items_in_creation_order() {
        let (service, _store, _bus) = setup();
        let cancel = CancellationToken::new();

        service.create_item("A", dec!(1), &cancel).await.unwrap();
        service.create_item("B", dec!(2), &cancel).await.unwrap();

        let names: Vec<String> = service
            .list_items()
            .into_iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
