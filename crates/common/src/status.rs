//! Order status state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The status of an order.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Success ◄──┐
///           │       └───────┘
///           └──► Failed ──► Success
/// ```
///
/// Create and update operations move an order to `Success`. No operation
/// persists `Failed` today; it exists so that externally written rows can be
/// represented and repaired by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order shell exists but has not been confirmed.
    #[default]
    Pending,

    /// Order was written with a fully resolved line set.
    Success,

    /// Order could not be fulfilled.
    Failed,
}

impl OrderStatus {
    /// All known statuses.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Success,
        OrderStatus::Failed,
    ];

    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Success)
                | (OrderStatus::Pending, OrderStatus::Failed)
                | (OrderStatus::Success, OrderStatus::Success)
                | (OrderStatus::Failed, OrderStatus::Success)
        )
    }

    /// Returns the storage and wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Success => "SUCCESS",
            OrderStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string does not name a known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_success_reachable_from_every_status() {
        for status in OrderStatus::ALL {
            assert!(status.can_transition_to(OrderStatus::Success));
        }
    }

    #[test]
    fn test_failed_only_from_pending() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Failed));
        assert!(!OrderStatus::Success.can_transition_to(OrderStatus::Failed));
        assert!(!OrderStatus::Failed.can_transition_to(OrderStatus::Failed));
    }

    #[test]
    fn test_nothing_returns_to_pending() {
        for status in OrderStatus::ALL {
            assert!(!status.can_transition_to(OrderStatus::Pending));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PENDING".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("success".parse::<OrderStatus>(), Ok(OrderStatus::Success));
        assert_eq!(
            "shipped".parse::<OrderStatus>(),
            Err(UnknownStatus("shipped".to_string()))
        );
    }

    #[test]
    fn test_serializes_upper_case() {
        let json = serde_json::to_string(&OrderStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
        let status: OrderStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(status, OrderStatus::Failed);
    }
}
