//! Catalog items and item lookup.

use common::ItemId;
use store::{ItemRecord, ItemStore};

use crate::error::DomainError;

/// A catalog item. Read-only from the order service's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price_cents: i64,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            price_cents: record.price_cents,
        }
    }
}

/// Resolves item references against the catalog.
#[derive(Clone)]
pub struct ItemService<S: ItemStore> {
    store: S,
}

impl<S: ItemStore> ItemService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Looks up an item by id.
    ///
    /// Fails with `InvalidArgument` for a non-positive id (without touching
    /// the store) and with `ItemNotFound` if the catalog has no such item.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, id: ItemId) -> Result<Item, DomainError> {
        if !id.is_valid() {
            return Err(DomainError::invalid(format!("item id must be positive, got {id}")));
        }

        self.store
            .find_item_by_id(id)
            .await?
            .map(Item::from)
            .ok_or(DomainError::ItemNotFound(id))
    }
}
