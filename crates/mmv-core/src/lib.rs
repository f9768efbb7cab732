//! `mmv-core` — foundational types for the multimodal visualizer engine.
//!
//! This crate is a dependency of every other `mmv-*` crate.  It has no
//! `mmv-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `PassengerId`, `VehicleId`, `SimulationId`, `StopId`       |
//! | [`geo`]     | `GeoPoint`, interpolation, planar distance                 |
//! | [`time`]    | `Timestamp`, `Order`, `Tick`, `TimeBounds`                 |
//! | [`status`]  | `PassengerStatus`, `VehicleStatus`, `SimulationStatus`     |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod status;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{PassengerId, SimulationId, StopId, VehicleId};
pub use status::{PassengerStatus, SimulationStatus, VehicleStatus};
pub use time::{Order, Tick, TimeBounds, Timestamp};
