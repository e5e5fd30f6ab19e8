//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. All platform rows
//! are keyed by UUIDs, so the wrappers carry a [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `Uuid` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_uuid()`
/// - `From<Uuid>` and `Into<Uuid>` implementations
///
/// # Example
///
/// ```rust
/// # use dimakatso_core::define_id;
/// # use uuid::Uuid;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new(Uuid::new_v4());
/// let order_id = OrderId::new(Uuid::new_v4());
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create a new ID from a `Uuid` value.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying `Uuid` value.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        let raw = Uuid::new_v4();
        let product_id = ProductId::new(raw);
        assert_eq!(product_id.as_uuid(), raw);
        assert_eq!(product_id.to_string(), raw.to_string());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let raw = Uuid::new_v4();
        let id = UserId::new(raw);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{raw}\""));

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
