use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier value.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// Returns true if the identifier is strictly positive.
            pub const fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

numeric_id!(
    /// Store-assigned identifier of an order.
    OrderId
);

numeric_id!(
    /// Store-assigned identifier of an order line.
    OrderLineId
);

numeric_id!(
    /// Identifier of a catalog item.
    ItemId
);

numeric_id!(
    /// Identifier of a user owned by the user directory.
    ///
    /// Existence is never checked when an order is written, only when the
    /// order is enriched for a response.
    UserId
);
