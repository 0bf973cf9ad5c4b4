//! Type-safe identifier wrappers around [`String`].
//!
//! Every entity in a player's island state has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. IDs are string-backed
//! because they travel verbatim through the JSON snapshot (building IDs like
//! `town_hall_1`, captain IDs like `ching_shih`) and must survive a
//! round-trip with clients that treat them as opaque keys.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a raw string key.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Return the raw string form of the identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

define_key! {
    /// Unique identifier for a building placed on the island grid.
    BuildingId
}

define_key! {
    /// Unique identifier for a ship in the player's fleet.
    ShipId
}

define_key! {
    /// Identifier of a collectible captain (also the content roster key).
    CaptainId
}

define_key! {
    /// Identifier of a technology (also the content tree key).
    TechnologyId
}

define_key! {
    /// Unique identifier for a specialized crew member.
    CrewId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_as_plain_strings() {
        let id = BuildingId::new("town_hall_1");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"town_hall_1\"");

        let back: Result<BuildingId, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(id));
    }

    #[test]
    fn display_matches_raw_form() {
        let id = TechnologyId::from("advanced_mining");
        assert_eq!(id.to_string(), "advanced_mining");
        assert_eq!(id.as_str(), "advanced_mining");
    }
}
