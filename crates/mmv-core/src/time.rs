//! Simulation time model.
//!
//! # Design
//!
//! Two clocks coexist in the visualizer:
//!
//! - **Simulation time** (`Timestamp`): seconds on the simulation's own
//!   clock, as stamped by the server on every state and update.  It is a
//!   float because the simulator emits fractional event times.
//! - **Playback ticks** (`Tick`): a monotonically increasing counter bumped
//!   by the playback timer.  The controller converts "a new tick happened"
//!   into one step of simulation time, so the tick counter itself never
//!   needs to know the playback speed.
//!
//! `Order` is the server-assigned sequence number shared by states and
//! updates.  Orders are unique; gaps mean data that has not arrived yet.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Simulation time, in seconds.
pub type Timestamp = f64;

/// Server sequence number of a state or update.
pub type Order = u64;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A playback tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick following `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// Ticks elapsed from `earlier` to `self` (zero if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeBounds ────────────────────────────────────────────────────────────────

/// The playable range of a simulation.
///
/// - `start`: first simulation timestamp.
/// - `end`:   final (or estimated final) timestamp, used for progress display.
/// - `max`:   latest timestamp that can be visualized right now.  For a
///            running simulation this is its current time; for a finished one
///            it equals `end`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBounds {
    pub start: Timestamp,
    pub end:   Timestamp,
    pub max:   Timestamp,
}

impl TimeBounds {
    /// Validate and build bounds.  `start` must not exceed `max`.
    pub fn new(start: Timestamp, end: Timestamp, max: Timestamp) -> CoreResult<Self> {
        for t in [start, end, max] {
            if !t.is_finite() {
                return Err(CoreError::NonFiniteTimestamp(t));
            }
        }
        if start > max {
            return Err(CoreError::InvalidBounds { start, max });
        }
        Ok(Self { start, end, max })
    }

    /// Clamp `t` into `[start, max]`.
    #[inline]
    pub fn clamp(&self, t: Timestamp) -> Timestamp {
        t.max(self.start).min(self.max)
    }

    /// `true` when `t` lies in `[start, max]`.
    #[inline]
    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t <= self.max
    }

    /// Length of the visualizable range.
    #[inline]
    pub fn span(&self) -> Timestamp {
        self.max - self.start
    }
}

impl fmt::Display for TimeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] (end {})", self.start, self.max, self.end)
    }
}
