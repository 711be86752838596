use thiserror::Error;

use modulith_core::DomainError;
use modulith_events::PublishError;

use crate::ItemId;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The item was rejected; nothing was stored or published.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The item was stored, but publishing `ItemCreated` did not complete.
    /// The catalog store is not rolled back.
    #[error("item {item_id} was stored but publishing ItemCreated failed: {source}")]
    Publish {
        item_id: ItemId,
        #[source]
        source: PublishError,
    },
}
