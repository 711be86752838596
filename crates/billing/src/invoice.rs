use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use modulith_catalog::{ItemCreated, ItemId};
use modulith_core::{DomainError, DomainResult, Entity};

/// Invoice reference, derived from the item the invoice bills for.
///
/// One item always maps to the same reference, so a redelivered
/// `ItemCreated` can never mint a second invoice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceReference(String);

impl InvoiceReference {
    const PREFIX: &'static str = "INV-";

    pub fn for_item(item_id: ItemId) -> Self {
        Self(format!("{}{}", Self::PREFIX, item_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for InvoiceReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    reference: InvoiceReference,
    source_item_id: ItemId,
    description: String,
    amount: Decimal,
    status: InvoiceStatus,
    issued_at: DateTime<Utc>,
}

impl Invoice {
    /// Build the invoice billing for a newly created catalog item.
    ///
    /// Invariant: amount must be positive. `issued_at` is the event's
    /// occurrence time, so rebuilding from the same event yields the same
    /// invoice.
    pub fn for_item_created(event: &ItemCreated) -> DomainResult<Self> {
        if event.price <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "cannot invoice item {} with non-positive price {}",
                event.item_id, event.price
            )));
        }

        Ok(Self {
            reference: InvoiceReference::for_item(event.item_id),
            source_item_id: event.item_id,
            description: event.name.clone(),
            amount: event.price,
            status: InvoiceStatus::Open,
            issued_at: event.occurred_at,
        })
    }

    pub fn reference(&self) -> &InvoiceReference {
        &self.reference
    }

    pub fn source_item_id(&self) -> ItemId {
        self.source_item_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

impl Entity for Invoice {
    type Id = InvoiceReference;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}
