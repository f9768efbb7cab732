//! `mmv-animation` — continuous per-entity animation from discrete data.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`passenger`]   | `passenger_fragments` (leg walk)                             |
//! | [`vehicle`]     | `vehicle_fragments` (dwell / travel alternation)             |
//! | [`position`]    | stop position resolution through arriving polylines          |
//! | [`events`]      | `StatusEvents` gathered from the continuous states' updates  |
//! | [`builder`]     | `AnimationBuilder`, `assemble` (gap-fill + statuses + fallback) |
//! | [`environment`] | `AnimatedEnvironment`, `Frame` and per-entity frames         |
//!
//! # Pipeline
//!
//! ```text
//! SimulationEnvironment ──fragments──► Timeline<()> ──splice──► Timeline<Status>
//!                                                                   │ at(t)
//!                                                                   ▼
//!                                                                 Frame
//! ```

pub mod builder;
pub mod environment;
pub mod events;
pub mod passenger;
pub mod position;
pub mod vehicle;


pub use builder::{AnimationBuilder, assemble};
pub use environment::{
    AnimatedEnvironment, AnimatedPassenger, AnimatedStop, AnimatedVehicle, Frame, PassengerFrame,
    PassengerTimeline, StopInfo, VehicleFrame, VehicleTimeline,
};
pub use events::StatusEvents;
pub use passenger::passenger_fragments;
pub use vehicle::vehicle_fragments;
