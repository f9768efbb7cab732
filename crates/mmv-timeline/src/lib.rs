//! `mmv-timeline` — gap-free animation timelines.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`interval`] | `AnimationInterval<S>`, `Fragment`, `IntervalData`, `StopRef`, `NotDisplayedReason` |
//! | [`timeline`] | `Window`, `Timeline<S>` (build, continuity check, sampling)   |
//! | [`status`]   | `StatusChange<S>`, `splice_statuses`                          |
//! | [`error`]    | `TimelineError`, `TimelineResult<T>`                          |
//!
//! Builders upstream emit sparse fragments; this crate turns them into a
//! timeline a renderer can sample at any instant of the window without
//! ever hitting a hole.

pub mod error;
pub mod interval;
pub mod status;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use error::{TimelineError, TimelineResult};
pub use interval::{AnimationInterval, Fragment, IntervalData, NotDisplayedReason, StopRef};
pub use status::{StatusChange, splice_statuses};
pub use timeline::{Timeline, Window};
