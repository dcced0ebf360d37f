//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{ItemId, OrderId, OrderLineId, OrderStatus, UserId};
use store::{OrderLineRecord, OrderRecord};

use crate::error::DomainError;
use crate::item::Item;

/// A line of an order: one catalog item and the quantity ordered.
///
/// Lines have no life outside the `Vec` of the order that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    id: Option<OrderLineId>,
    item_id: ItemId,
    quantity: u32,
}

impl OrderLine {
    /// Creates an unsaved line for a resolved catalog item.
    pub fn new(item: &Item, quantity: u32) -> Self {
        Self {
            id: None,
            item_id: item.id,
            quantity,
        }
    }

    pub fn id(&self) -> Option<OrderLineId> {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Order aggregate root.
///
/// Owns its lines. The line set is only ever replaced as a whole: it is
/// cleared and rebuilt, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Option<OrderId>,
    user_id: UserId,
    status: OrderStatus,
    lines: Vec<OrderLine>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates an unsaved, pending order shell with no lines.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: None,
            user_id,
            status: OrderStatus::Pending,
            lines: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the lines in the order they were attached.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Removes every line.
    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    /// Appends lines, preserving their order.
    pub fn attach_lines(&mut self, lines: impl IntoIterator<Item = OrderLine>) {
        self.lines.extend(lines);
    }

    /// Moves the order to `next`, rejecting illegal transitions.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Marks a successfully written order.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        self.transition_to(OrderStatus::Success)
    }

    /// Converts the aggregate into its persisted shape.
    pub fn into_record(self) -> OrderRecord {
        OrderRecord {
            id: self.id,
            user_id: self.user_id,
            status: self.status,
            lines: self
                .lines
                .into_iter()
                .map(|line| OrderLineRecord {
                    id: line.id,
                    item_id: line.item_id,
                    quantity: line.quantity,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            status: record.status,
            lines: record
                .lines
                .into_iter()
                .map(|line| OrderLine {
                    id: line.id,
                    item_id: line.item_id,
                    quantity: line.quantity,
                })
                .collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> Item {
        Item {
            id: ItemId::new(id),
            name: format!("Item {id}"),
            price_cents: 100,
        }
    }

    #[test]
    fn test_new_order_is_pending_and_empty() {
        let order = Order::new(UserId::new(123));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.lines().is_empty());
        assert!(order.id().is_none());
    }

    #[test]
    fn test_attach_preserves_order() {
        let mut order = Order::new(UserId::new(1));
        order.attach_lines([OrderLine::new(&item(3), 1), OrderLine::new(&item(1), 2)]);

        let ids: Vec<_> = order.lines().iter().map(OrderLine::item_id).collect();
        assert_eq!(ids, vec![ItemId::new(3), ItemId::new(1)]);
    }

    #[test]
    fn test_clear_then_attach_replaces() {
        let mut order = Order::new(UserId::new(1));
        order.attach_lines([OrderLine::new(&item(1), 2)]);
        order.clear_lines();
        order.attach_lines([OrderLine::new(&item(2), 5)]);

        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.lines()[0].item_id(), ItemId::new(2));
        assert_eq!(order.lines()[0].quantity(), 5);
    }

    #[test]
    fn test_confirm_moves_to_success() {
        let mut order = Order::new(UserId::new(1));
        order.confirm().unwrap();
        assert_eq!(order.status(), OrderStatus::Success);

        // Re-confirming after an update is legal
        order.confirm().unwrap();
        assert_eq!(order.status(), OrderStatus::Success);
    }

    #[test]
    fn test_illegal_transition_is_rejected() {
        let mut order = Order::new(UserId::new(1));
        order.confirm().unwrap();

        let err = order.transition_to(OrderStatus::Failed).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStatusTransition {
                from: OrderStatus::Success,
                to: OrderStatus::Failed
            }
        ));
        assert_eq!(order.status(), OrderStatus::Success);
    }

    #[test]
    fn test_record_conversion_keeps_lines() {
        let mut order = Order::new(UserId::new(9));
        order.attach_lines([OrderLine::new(&item(1), 2), OrderLine::new(&item(2), 4)]);

        let record = order.clone().into_record();
        assert_eq!(record.user_id, UserId::new(9));
        assert_eq!(record.lines.len(), 2);
        assert_eq!(record.lines[1].quantity, 4);

        assert_eq!(Order::from(record), order);
    }
}
