//! Catalog module.
//!
//! Owns catalog items and their store. After an item is persisted the module
//! publishes [`ItemCreated`]; other modules react to that event and never read
//! the catalog store directly.

pub mod error;
pub mod item;
pub mod service;

pub use error::CatalogError;
pub use item::{CatalogItem, ItemCreated, ItemId};
pub use service::CatalogService;
