//! Strongly typed, string-backed identifier wrappers.
//!
//! The simulation server names every entity with an opaque string.  Wrapping
//! each kind in its own type keeps a `VehicleId` from being looked up in the
//! passenger map.  All IDs are `Ord + Hash` so they can key both `HashMap`s
//! and the ordered maps used for deterministic snapshots.

use std::fmt;

use crate::GeoPoint;

/// Generate a typed ID wrapper around a `String`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id! {
    /// Identifier of a passenger (a trip, possibly carrying several people).
    pub struct PassengerId;
}

typed_id! {
    /// Identifier of a vehicle.
    pub struct VehicleId;
}

typed_id! {
    /// Identifier of a simulation run on the server.
    pub struct SimulationId;
}

typed_id! {
    /// Identifier of a physical stop.  Two vehicles visiting the same
    /// position visit the same stop.
    pub struct StopId;
}

impl StopId {
    /// Derive the stop identifier from its position: `"{lat},{lon}"`.
    pub fn from_position(position: GeoPoint) -> Self {
        Self(format!("{},{}", position.latitude, position.longitude))
    }
}
