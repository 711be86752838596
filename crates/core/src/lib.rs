//! `modulith-core` — building blocks shared by every module.
//!
//! This crate contains **pure domain** primitives (identifiers, errors,
//! entity/store contracts). It knows nothing about events or dispatch.

pub mod entity;
pub mod error;
pub mod id;
pub mod store;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, EventId};
pub use store::{InMemoryStore, Store};
