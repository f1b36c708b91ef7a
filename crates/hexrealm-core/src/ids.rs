//! Strongly-typed identifiers.
//!
//! Every identifier wraps a UUID and serializes as its plain string form,
//! so event payloads stay flat. Parsing a string that is not a UUID fails
//! with [`ValueError::InvalidIdentifier`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValueError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(self) -> Uuid {
                self.0
            }

            /// Parses an identifier from its string form.
            ///
            /// # Errors
            ///
            /// Returns `ValueError::InvalidIdentifier` if `value` is not a UUID.
            pub fn parse(value: &str) -> Result<Self, ValueError> {
                Uuid::parse_str(value)
                    .map(Self)
                    .map_err(|_| ValueError::InvalidIdentifier(value.to_owned()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a game (also the Game aggregate stream).
    GameId
);
define_id!(
    /// Identifier of a player; one per (user, game). Keys the Player and
    /// TechnologyTree aggregates.
    PlayerId
);
define_id!(
    /// Identifier of an authenticated user account.
    UserId
);
define_id!(
    /// Identifier of a unit.
    UnitId
);
define_id!(
    /// Identifier of a city.
    CityId
);
define_id!(
    /// Identifier of a catalog technology.
    TechnologyId
);
define_id!(
    /// Identifier of a diplomacy agreement.
    DiplomacyId
);

/// Derives a stable stream identifier from a parent id and a discriminator.
///
/// Used for aggregates keyed by more than one id (per-player visibility)
/// and for ids that must be identical across retries (initial units).
#[must_use]
pub fn derived_id(parent: Uuid, discriminator: &str) -> Uuid {
    Uuid::new_v5(&parent, discriminator.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_valid_uuid() {
        let uuid = Uuid::new_v4();

        let id = GameId::parse(&uuid.to_string()).unwrap();

        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_parse_rejects_non_uuid() {
        let result = PlayerId::parse("not-a-uuid");

        assert_eq!(
            result,
            Err(ValueError::InvalidIdentifier("not-a-uuid".to_owned()))
        );
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let uuid = Uuid::new_v4();
        let id = UnitId::from_uuid(uuid);

        let json = serde_json::to_value(id).unwrap();

        assert_eq!(json, serde_json::Value::String(uuid.to_string()));
    }

    #[test]
    fn test_derived_id_is_stable() {
        let parent = Uuid::new_v4();

        assert_eq!(derived_id(parent, "warrior"), derived_id(parent, "warrior"));
        assert_ne!(derived_id(parent, "warrior"), derived_id(parent, "settler"));
    }
}
