//! Persisted shapes of orders, order lines and catalog items.

use chrono::{DateTime, Utc};

use crate::{ItemId, OrderId, OrderLineId, OrderStatus, UserId};

/// A persisted order together with the lines it owns.
///
/// `id`, `created_at` and `updated_at` are `None` until the record has been
/// saved once; the store assigns them.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: Option<OrderId>,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Lines in insertion order.
    pub lines: Vec<OrderLineRecord>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    /// Creates an unsaved record with no lines.
    pub fn new(user_id: UserId, status: OrderStatus) -> Self {
        Self {
            id: None,
            user_id,
            status,
            lines: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Appends a line, returning the record for chaining.
    pub fn with_line(mut self, item_id: ItemId, quantity: u32) -> Self {
        self.lines.push(OrderLineRecord {
            id: None,
            item_id,
            quantity,
        });
        self
    }
}

/// A persisted order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRecord {
    pub id: Option<OrderLineId>,
    pub item_id: ItemId,
    pub quantity: u32,
}

/// A catalog item as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub price_cents: i64,
}

impl ItemRecord {
    pub fn new(id: ItemId, name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price_cents,
        }
    }
}
