//! Domain error types.

use common::{ItemId, OrderId, OrderStatus};
use store::StoreError;
use thiserror::Error;
use user_directory::DirectoryError;

/// Broad classification of a domain failure, used at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Conflict,
    UpstreamUnavailable,
    Internal,
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced order does not exist.
    #[error("There is no order with id {0}")]
    OrderNotFound(OrderId),

    /// The referenced catalog item does not exist.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// An identifier or collection argument was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The order cannot move between these statuses.
    #[error("Invalid status transition: cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// The store rejected a write because of an integrity violation.
    #[error("Data integrity violation: {0}")]
    Conflict(String),

    /// The user directory could not serve a lookup.
    #[error("User directory unavailable: {0}")]
    UpstreamUnavailable(#[from] DirectoryError),

    /// Any other store failure.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DomainError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::OrderNotFound(_) | DomainError::ItemNotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidArgument(_) | DomainError::InvalidStatusTransition { .. } => {
                ErrorKind::InvalidArgument
            }
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            DomainError::Store(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument(message.into())
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(message) => DomainError::Conflict(message),
            StoreError::NotFound(id) => DomainError::OrderNotFound(id),
            other => DomainError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_conflict_becomes_conflict() {
        let err = DomainError::from(StoreError::Conflict("fk".to_string()));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn store_not_found_becomes_order_not_found() {
        let err = DomainError::from(StoreError::NotFound(OrderId::new(3)));
        assert!(matches!(err, DomainError::OrderNotFound(id) if id == OrderId::new(3)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn other_store_errors_are_internal() {
        let err = DomainError::from(StoreError::Corrupt("bad status".to_string()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn directory_errors_are_upstream() {
        let err = DomainError::from(DirectoryError::Timeout("2s".to_string()));
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    }

    #[test]
    fn message_names_missing_order() {
        let err = DomainError::OrderNotFound(OrderId::new(999));
        assert_eq!(err.to_string(), "There is no order with id 999");
    }
}
