//! Domain types for the chirper social graph with strong typing.
//!
//! Identifiers follow the newtype pattern so a follower id can never be passed
//! where a chirp id is expected. Validated values (`Username`, `ChirpText`)
//! can only be built through their `parse` constructors.

pub mod chirp;
pub mod identity;
pub mod session;

pub use chirp::{Chirp, ChirpText, ChirpTextError};
pub use identity::{Identity, IdentityProfile, Username, UsernameError};
pub use session::AuthContext;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                debug_assert!(id >= 0, concat!(stringify!($name), " should be non-negative"));
                Self(id)
            }

            /// Returns the underlying i32 value.
            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_i32(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let id = i32::deserialize(deserializer)?;
                Ok(Self::new(id))
            }
        }
    };
}

id_newtype!(
    /// Stable identifier of an identity. Follow edges are stored and compared
    /// by this id, never by username.
    ///
    /// ```rust
    /// use chirper::domain::UserId;
    ///
    /// let id = UserId::new(7);
    /// assert_eq!(id.value(), 7);
    /// assert_eq!(id.to_string(), "7");
    /// ```
    UserId
);

id_newtype!(
    /// Identifier of a chirp.
    ChirpId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_conversions() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(UserId::from(42), id);
    }

    #[test]
    fn ids_order_by_value() {
        let mut ids = vec![ChirpId::new(3), ChirpId::new(1), ChirpId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![ChirpId::new(1), ChirpId::new(2), ChirpId::new(3)]);
    }

    #[test]
    fn user_id_serializes_as_plain_integer() {
        let id = UserId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }
}
