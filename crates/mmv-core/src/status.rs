//! Entity and simulation status enums shared across the engine.
//!
//! Wire names are the lowercase strings the simulation server emits.  Each
//! enum exposes `as_str` for CSV columns and log lines, and `FromStr` for
//! hand-written fixtures.

use std::str::FromStr;

use crate::CoreError;

/// Generate `as_str`, `Display` and `FromStr` for a unit-variant enum.
macro_rules! wire_names {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire / display name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(CoreError::UnknownStatus(other.to_owned())),
                }
            }
        }
    };
}

/// Lifecycle of a passenger trip.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PassengerStatus {
    #[default]
    Release,
    Assigned,
    Ready,
    Onboard,
    Complete,
}

wire_names!(PassengerStatus {
    Release  => "release",
    Assigned => "assigned",
    Ready    => "ready",
    Onboard  => "onboard",
    Complete => "complete",
});

/// Lifecycle of a vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VehicleStatus {
    #[default]
    Release,
    Idle,
    Boarding,
    Enroute,
    Alighting,
    Complete,
}

wire_names!(VehicleStatus {
    Release   => "release",
    Idle      => "idle",
    Boarding  => "boarding",
    Enroute   => "enroute",
    Alighting => "alighting",
    Complete  => "complete",
});

/// Status of a simulation run as reported by the server.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SimulationStatus {
    Starting,
    Paused,
    Running,
    Stopping,
    Completed,
    Lost,
    Corrupted,
    Outdated,
    Future,
}

wire_names!(SimulationStatus {
    Starting  => "starting",
    Paused    => "paused",
    Running   => "running",
    Stopping  => "stopping",
    Completed => "completed",
    Lost      => "lost",
    Corrupted => "corrupted",
    Outdated  => "outdated",
    Future    => "future",
});

impl SimulationStatus {
    /// `true` while the server may still append states to this simulation.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(
            self,
            SimulationStatus::Starting
                | SimulationStatus::Running
                | SimulationStatus::Paused
                | SimulationStatus::Stopping
                | SimulationStatus::Lost
        )
    }
}
