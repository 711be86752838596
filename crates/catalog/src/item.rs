use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use modulith_core::{AggregateId, DomainError, DomainResult, Entity};
use modulith_events::Event;

/// Catalog item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub AggregateId);

impl ItemId {
    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A sellable item, owned by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    id: ItemId,
    name: String,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Validate and build a new item. Names are trimmed; prices may be zero
    /// but never negative.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        price: Decimal,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("item name must not be blank"));
        }
        if price < Decimal::ZERO {
            return Err(DomainError::validation("item price must not be negative"));
        }

        Ok(Self {
            id,
            name,
            price,
            created_at,
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for CatalogItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Event: ItemCreated.
///
/// Carries everything downstream modules need about the new item; consumers
/// must not look the item up in the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreated {
    pub item_id: ItemId,
    pub name: String,
    pub price: Decimal,
    pub occurred_at: DateTime<Utc>,
}

impl From<&CatalogItem> for ItemCreated {
    fn from(item: &CatalogItem) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            price: item.price,
            occurred_at: item.created_at,
        }
    }
}

impl Event for ItemCreated {
    const KIND: &'static str = "catalog.item.created";

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_item_trims_name() {
        let item = CatalogItem::new(ItemId::generate(), "  Widget ", dec!(9.99), Utc::now()).unwrap();
        assert_eq!(item.name(), "Widget");
        assert_eq!(item.price(), dec!(9.99));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = CatalogItem::new(ItemId::generate(), "   ", dec!(1), Utc::now()).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("name") => {}
            other => panic!("Expected Validation for blank name, got {other:?}"),
        }
    }

    #[test]
    fn negative_price_is_rejected_but_zero_is_allowed() {
        let err = CatalogItem::new(ItemId::generate(), "Gadget", dec!(-0.01), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert!(CatalogItem::new(ItemId::generate(), "Sample", dec!(0), Utc::now()).is_ok());
    }

    #[test]
    fn item_created_copies_item_fields() {
        let item = CatalogItem::new(ItemId::generate(), "Widget", dec!(9.99), Utc::now()).unwrap();
        let event = ItemCreated::from(&item);

        assert_eq!(event.item_id, item.item_id());
        assert_eq!(event.name, "Widget");
        assert_eq!(event.price, dec!(9.99));
        assert_eq!(event.occurred_at, item.created_at());
        assert_eq!(event.kind(), "catalog.item.created");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any non-blank name with a non-negative price is accepted,
            /// and the event mirrors the stored item exactly.
            #[test]
            fn valid_items_round_trip_into_events(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                cents in 0i64..10_000_000,
            ) {
                let price = Decimal::new(cents, 2);
                let item = CatalogItem::new(ItemId::generate(), name.clone(), price, Utc::now()).unwrap();
                let event = ItemCreated::from(&item);

                prop_assert_eq!(item.name(), name.trim());
                prop_assert_eq!(event.price, price);
                prop_assert_eq!(event.name, item.name());
            }
        }
    }
}
