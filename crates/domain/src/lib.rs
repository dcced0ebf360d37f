//! Domain layer for the order service.
//!
//! This crate provides:
//! - Item lookup against the catalog ([`ItemService`])
//! - The order aggregate and line building ([`Order`], [`OrderLineBuilder`])
//! - The order lifecycle service ([`OrderService`])
//! - Best-effort user enrichment of responses ([`UserEnricher`])

pub mod enrichment;
pub mod error;
pub mod item;
pub mod order;

pub use common::{ItemId, OrderId, OrderLineId, OrderStatus, UserId};
pub use enrichment::UserEnricher;
pub use error::{DomainError, ErrorKind};
pub use item::{Item, ItemService};
pub use order::{
    CreateOrder, LineRequest, Order, OrderLine, OrderLineBuilder, OrderLineResponse,
    OrderResponse, OrderService, UpdateOrder,
};
