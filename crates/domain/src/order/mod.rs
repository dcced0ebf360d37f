//! Order aggregate and lifecycle.

mod aggregate;
mod commands;
mod lines;
mod response;
mod service;

pub use aggregate::{Order, OrderLine};
pub use commands::{CreateOrder, LineRequest, UpdateOrder};
pub use lines::OrderLineBuilder;
pub use response::{OrderLineResponse, OrderResponse};
pub use service::OrderService;
