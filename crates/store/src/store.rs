use async_trait::async_trait;

use crate::{ItemId, ItemRecord, OrderId, OrderRecord, OrderStatus, Result};

/// Persistence of the order aggregate.
///
/// An order and its lines are always read and written as one unit.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Retrieves an order with its lines.
    ///
    /// Returns None if the order doesn't exist.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// Retrieves every order whose id is in `ids`.
    ///
    /// Ids that don't exist are skipped. Results are ordered by ascending id
    /// and contain each order at most once.
    async fn find_all_by_id(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>>;

    /// Retrieves all orders with the given status, ordered by ascending id.
    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<OrderRecord>>;

    /// Inserts or updates an order.
    ///
    /// A record without an id is inserted and assigned one. A record with an
    /// id replaces the stored order and its complete line set. The write is
    /// atomic - either the order row and every line change commit, or none
    /// do. Returns the record as stored, with ids and timestamps populated.
    async fn save(&self, order: OrderRecord) -> Result<OrderRecord>;

    /// Checks if an order exists.
    async fn exists_by_id(&self, id: OrderId) -> Result<bool>;

    /// Deletes an order and its lines. Deleting a missing order is a no-op.
    async fn delete_by_id(&self, id: OrderId) -> Result<()>;

    /// Deletes every order and line.
    async fn delete_all(&self) -> Result<()>;
}

/// Read access to the item catalog.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Retrieves a catalog item.
    ///
    /// Returns None if the item doesn't exist.
    async fn find_item_by_id(&self, id: ItemId) -> Result<Option<ItemRecord>>;
}
