use thiserror::Error;

use crate::OrderId;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write violated a uniqueness or referential integrity constraint.
    #[error("Integrity violation: {0}")]
    Conflict(String),

    /// An update targeted an order that no longer exists.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// A stored row could not be mapped back to a record.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
