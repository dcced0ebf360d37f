//! Order response shape returned to callers.

use chrono::{DateTime, Utc};
use common::{ItemId, OrderId, OrderStatus, UserId};
use serde::Serialize;
use user_directory::UserSnapshot;

use super::{Order, OrderLine};

/// An order as returned by the lifecycle service, optionally carrying the
/// user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Option<OrderId>,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub order_items: Vec<OrderLineResponse>,
    /// Absent when the user directory could not provide the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl From<&OrderLine> for OrderLineResponse {
    fn from(line: &OrderLine) -> Self {
        Self {
            item_id: line.item_id(),
            quantity: line.quantity(),
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            user_id: order.user_id(),
            status: order.status(),
            order_items: order.lines().iter().map(OrderLineResponse::from).collect(),
            user: None,
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    #[test]
    fn serializes_camel_case_without_user() {
        let mut order = Order::new(UserId::new(123));
        let item = Item {
            id: ItemId::new(1),
            name: "Widget".to_string(),
            price_cents: 100,
        };
        order.attach_lines([OrderLine::new(&item, 2)]);

        let json = serde_json::to_value(OrderResponse::from(&order)).unwrap();
        assert_eq!(json["userId"], 123);
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["orderItems"][0]["itemId"], 1);
        assert_eq!(json["orderItems"][0]["quantity"], 2);
        assert!(json.get("user").is_none());
    }
}
