pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::{ItemId, OrderId, OrderLineId, OrderStatus, UserId};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use record::{ItemRecord, OrderLineRecord, OrderRecord};
pub use store::{ItemStore, OrderStore};
