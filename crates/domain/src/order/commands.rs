//! Order commands.

use common::{ItemId, OrderId, UserId};

/// A requested order line: which item and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRequest {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl LineRequest {
    pub fn new(item_id: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Command to create a new order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// The user placing the order.
    pub user_id: UserId,

    /// Requested lines, in display order.
    pub lines: Vec<LineRequest>,
}

impl CreateOrder {
    /// Creates a new CreateOrder command.
    pub fn new(user_id: impl Into<UserId>, lines: Vec<LineRequest>) -> Self {
        Self {
            user_id: user_id.into(),
            lines,
        }
    }
}

/// Command to replace the line set of an existing order.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    /// The order to update.
    pub order_id: OrderId,

    /// The complete new line set.
    pub lines: Vec<LineRequest>,
}

impl UpdateOrder {
    /// Creates a new UpdateOrder command.
    pub fn new(order_id: impl Into<OrderId>, lines: Vec<LineRequest>) -> Self {
        Self {
            order_id: order_id.into(),
            lines,
        }
    }
}
