//! `mmv-model` — the simulation data model and update replay.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`entity`]      | `Leg`, `Passenger`, `Stop`, `Vehicle`, `dedupe_stops`     |
//! | [`polyline`]    | `Polyline`, `VehiclePolylines`, `AllPolylines`            |
//! | [`update`]      | `Update`, `UpdateKind` and payloads, `Statistic`          |
//! | [`state`]       | `SimulationState` (snapshot + trailing updates)           |
//! | [`environment`] | `SimulationEnvironment`, `build_environment`              |
//! | [`simulation`]  | `Simulation` descriptor, time bounds                      |
//! | [`loader`]      | `read_state_jsonl`, `load_states_dir`, JSON loaders       |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                            |
//!
//! # Replay model
//!
//! ```text
//! env(wanted) = state ⊕ u₁ ⊕ u₂ ⊕ … ⊕ uₖ    where uₖ.timestamp ≤ wanted < uₖ₊₁.timestamp
//! ```
//!
//! Replay is pure: the stored state is cloned, never mutated.

pub mod entity;
pub mod environment;
pub mod error;
pub mod loader;
pub mod polyline;
pub mod simulation;
pub mod state;
pub mod update;


pub use entity::{Leg, Passenger, Stop, Vehicle, dedupe_stops};
pub use environment::{SimulationEnvironment, build_environment};
pub use error::{ModelError, ModelResult};
pub use loader::{load_polylines_json, load_simulation_json, load_state_file, load_states_dir, read_state_jsonl};
pub use polyline::{AllPolylines, Polyline, VehiclePolylines};
pub use simulation::{Simulation, SimulationConfiguration};
pub use state::SimulationState;
pub use update::{
    PassengerLegsUpdate, PassengerStatusUpdate, Statistic, StatisticUpdate, Update, UpdateKind,
    VehicleStatusUpdate, VehicleStopsUpdate,
};
