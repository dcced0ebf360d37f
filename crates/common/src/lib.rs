//! Shared types for the order service.

pub mod status;
pub mod types;

pub use status::{OrderStatus, UnknownStatus};
pub use types::{ItemId, OrderId, OrderLineId, UserId};
