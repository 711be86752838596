//! Billing module.
//!
//! Billing never calls into the catalog. It learns about new items only
//! through `ItemCreated` events and keeps its own invoice store. The only
//! thing it shares with the catalog crate is that event contract.

pub mod invoice;
pub mod projection;
pub mod service;

pub use invoice::{Invoice, InvoiceReference, InvoiceStatus};
pub use projection::{Applied, BillingProjection};
pub use service::BillingService;
