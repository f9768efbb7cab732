//! `mmv-control` — playback clock, fetch pacing and the frame pipeline.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`timer`]      | `Timer`, an owned deadline driven by the caller's clock    |
//! | [`debounce`]   | `Debouncer<T>` (newest arguments win, fires once)          |
//! | [`controller`] | `VisualizationController`, `ControllerPhase`               |
//! | [`source`]     | `DataSource` trait, `StatesRequest`, `StatesResponse`      |
//! | [`observer`]   | `FrameObserver` trait, `NoopObserver`                      |
//! | [`config`]     | `VisualizerConfig`                                         |
//! | [`visualizer`] | `Visualizer` (continuity → wanted time → snapshot → frame) |
//! | [`error`]      | `ControlError`, `ControlResult<T>`                         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut vis = Visualizer::new(VisualizerConfig::default())?;
//! vis.update_simulation(simulation, clock.now())?;
//! loop {
//!     if let Some(frame) = vis.frame(clock.now(), &mut source) {
//!         render(&frame);
//!     }
//!     // Each answer carries the simulation it was requested for.
//!     for response in source.drain() {
//!         vis.on_states_received(response);
//!     }
//! }
//! ```

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod observer;
pub mod source;
pub mod timer;
pub mod visualizer;

#[cfg(test)]
mod tests;

pub use config::VisualizerConfig;
pub use controller::{ControllerPhase, VisualizationController};
pub use debounce::Debouncer;
pub use error::{ControlError, ControlResult};
pub use observer::{FrameObserver, NoopObserver};
pub use source::{DataSource, Request, StatesRequest, StatesResponse};
pub use timer::Timer;
pub use visualizer::Visualizer;
