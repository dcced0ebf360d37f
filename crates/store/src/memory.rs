use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    ItemId, ItemRecord, OrderId, OrderLineId, OrderRecord, OrderStatus, Result, StoreError,
    store::{ItemStore, OrderStore},
};

#[derive(Debug, Default)]
struct State {
    orders: BTreeMap<OrderId, OrderRecord>,
    items: HashMap<ItemId, ItemRecord>,
    last_order_id: i64,
    last_line_id: i64,
}

/// In-memory store implementation for testing and local runs.
///
/// This implementation keeps all records in memory and provides the same
/// interface and integrity rules as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a catalog item.
    pub async fn insert_item(&self, item: ItemRecord) {
        self.state.write().await.items.insert(item.id, item);
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Clears all orders and items.
    pub async fn clear(&self) {
        *self.state.write().await = State::default();
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn find_all_by_id(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>> {
        let wanted: BTreeSet<OrderId> = ids.iter().copied().collect();
        let state = self.state.read().await;
        Ok(wanted
            .iter()
            .filter_map(|id| state.orders.get(id).cloned())
            .collect())
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .filter(|order| order.status == status)
            .cloned()
            .collect())
    }

    async fn save(&self, mut order: OrderRecord) -> Result<OrderRecord> {
        let mut state = self.state.write().await;

        // Foreign key simulation
        if let Some(line) = order
            .lines
            .iter()
            .find(|line| !state.items.contains_key(&line.item_id))
        {
            return Err(StoreError::Conflict(format!(
                "order line references missing item {}",
                line.item_id
            )));
        }
        // CHECK (quantity > 0)
        if let Some(line) = order.lines.iter().find(|line| line.quantity == 0) {
            return Err(StoreError::Conflict(format!(
                "order line for item {} has non-positive quantity",
                line.item_id
            )));
        }

        let now = Utc::now();
        match order.id {
            Some(id) => {
                let existing = state.orders.get(&id).ok_or(StoreError::NotFound(id))?;
                order.created_at = existing.created_at;
            }
            None => {
                state.last_order_id += 1;
                order.id = Some(OrderId::new(state.last_order_id));
                order.created_at = Some(now);
            }
        }
        order.updated_at = Some(now);

        // Lines are replaced wholesale, so every line gets a fresh id
        for line in &mut order.lines {
            state.last_line_id += 1;
            line.id = Some(OrderLineId::new(state.last_line_id));
        }

        if let Some(id) = order.id {
            state.orders.insert(id, order.clone());
        }
        Ok(order)
    }

    async fn exists_by_id(&self, id: OrderId) -> Result<bool> {
        Ok(self.state.read().await.orders.contains_key(&id))
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<()> {
        self.state.write().await.orders.remove(&id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.state.write().await.orders.clear();
        Ok(())
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn find_item_by_id(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;

    async fn store_with_items() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert_item(ItemRecord::new(ItemId::new(1), "Widget", 5000))
            .await;
        store
            .insert_item(ItemRecord::new(ItemId::new(2), "Gadget", 1250))
            .await;
        store
    }

    fn order(user: i64, status: OrderStatus) -> OrderRecord {
        OrderRecord::new(UserId::new(user), status)
    }

    #[tokio::test]
    async fn save_assigns_ids_and_timestamps() {
        let store = store_with_items().await;

        let saved = store
            .save(order(123, OrderStatus::Success).with_line(ItemId::new(1), 2))
            .await
            .unwrap();

        assert_eq!(saved.id, Some(OrderId::new(1)));
        assert!(saved.created_at.is_some());
        assert!(saved.updated_at.is_some());
        assert_eq!(saved.lines[0].id, Some(OrderLineId::new(1)));
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn save_existing_replaces_line_set() {
        let store = store_with_items().await;
        let saved = store
            .save(
                order(123, OrderStatus::Success)
                    .with_line(ItemId::new(1), 2)
                    .with_line(ItemId::new(2), 1),
            )
            .await
            .unwrap();

        let mut updated = saved.clone();
        updated.lines.clear();
        updated = updated.with_line(ItemId::new(2), 7);
        store.save(updated).await.unwrap();

        let loaded = store.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.lines.len(), 1);
        assert_eq!(loaded.lines[0].item_id, ItemId::new(2));
        assert_eq!(loaded.lines[0].quantity, 7);
        assert_eq!(loaded.created_at, saved.created_at);
    }

    #[tokio::test]
    async fn save_rejects_missing_item_without_writing() {
        let store = store_with_items().await;

        let result = store
            .save(order(123, OrderStatus::Success).with_line(ItemId::new(99), 1))
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn save_rejects_zero_quantity_without_writing() {
        let store = store_with_items().await;

        let result = store
            .save(
                order(123, OrderStatus::Success)
                    .with_line(ItemId::new(1), 2)
                    .with_line(ItemId::new(2), 0),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn save_with_unknown_id_fails() {
        let store = store_with_items().await;
        let mut record = order(1, OrderStatus::Success);
        record.id = Some(OrderId::new(42));

        let result = store.save(record).await;
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == OrderId::new(42)));
    }

    #[tokio::test]
    async fn find_all_by_id_skips_missing() {
        let store = store_with_items().await;
        let first = store.save(order(1, OrderStatus::Pending)).await.unwrap();

        let found = store
            .find_all_by_id(&[OrderId::new(2), first.id.unwrap()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, first.id);
    }

    #[tokio::test]
    async fn find_all_by_id_orders_by_id_and_ignores_duplicates() {
        let store = store_with_items().await;
        let first = store.save(order(1, OrderStatus::Pending)).await.unwrap();
        let second = store.save(order(2, OrderStatus::Success)).await.unwrap();
        let (first, second) = (first.id.unwrap(), second.id.unwrap());

        let found = store
            .find_all_by_id(&[second, first, second])
            .await
            .unwrap();

        let ids: Vec<_> = found.iter().filter_map(|order| order.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let store = store_with_items().await;
        let pending = store.save(order(1, OrderStatus::Pending)).await.unwrap();
        store.save(order(1, OrderStatus::Success)).await.unwrap();

        let found = store.find_by_status(OrderStatus::Pending).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, pending.id);
    }

    #[tokio::test]
    async fn delete_removes_order() {
        let store = store_with_items().await;
        let saved = store.save(order(1, OrderStatus::Pending)).await.unwrap();
        let id = saved.id.unwrap();

        assert!(store.exists_by_id(id).await.unwrap());
        store.delete_by_id(id).await.unwrap();
        assert!(!store.exists_by_id(id).await.unwrap());
        assert!(store.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_all_keeps_catalog() {
        let store = store_with_items().await;
        store.save(order(1, OrderStatus::Pending)).await.unwrap();
        store.delete_all().await.unwrap();

        assert_eq!(store.order_count().await, 0);
        assert!(
            store
                .find_item_by_id(ItemId::new(1))
                .await
                .unwrap()
                .is_some()
        );
    }
}
