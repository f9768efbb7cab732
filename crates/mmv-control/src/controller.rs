//! `VisualizationController` — the playback clock.
//!
//! # Phases
//!
//! ```text
//!  Uninitialized ──initialize──► Playing ◄──pause/resume──► Paused
//!        ▲                          │                          │
//!        └──────initialize────── Destroyed ◄─────destroy───────┘
//! ```
//!
//! The playback timer keeps ticking while paused; pausing only freezes the
//! wanted time.  Ticks advance the wanted time by one simulation second in
//! the direction of the speed, and the tick interval shrinks with `|speed|`,
//! so playback runs at `speed` simulation seconds per real second.

use std::time::Duration;

use tracing::{debug, trace};

use mmv_core::{Tick, TimeBounds, Timestamp};
use mmv_model::Simulation;

use crate::timer::Timer;
use crate::{ControlError, ControlResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControllerPhase {
    Uninitialized,
    Playing,
    Paused,
    Destroyed,
}

impl ControllerPhase {
    #[inline]
    pub fn is_initialized(self) -> bool {
        matches!(self, ControllerPhase::Playing | ControllerPhase::Paused)
    }
}

#[derive(Clone, Debug)]
pub struct VisualizationController {
    phase:              ControllerPhase,
    bounds:             Option<TimeBounds>,
    speed:              f64,
    base_tick_interval: Duration,
    playback:           Timer,
    tick:               Tick,
    /// Tick consumed by the last advancing derivation.
    derived_tick:       Tick,
    wanted:             Option<Timestamp>,
    time_override:      Option<Timestamp>,
}

impl VisualizationController {
    pub fn new(base_tick_interval: Duration) -> Self {
        Self {
            phase: ControllerPhase::Uninitialized,
            bounds: None,
            speed: 1.0,
            base_tick_interval,
            playback: Timer::stopped(),
            tick: Tick::ZERO,
            derived_tick: Tick::ZERO,
            wanted: None,
            time_override: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    #[inline]
    pub fn bounds(&self) -> Option<TimeBounds> {
        self.bounds
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// The last derived wanted time.
    #[inline]
    pub fn wanted_time(&self) -> Option<Timestamp> {
        self.wanted
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == ControllerPhase::Paused
    }

    /// Real time between two ticks at the current speed.
    ///
    /// Saturates at `Duration::MAX` for speeds so slow the interval cannot
    /// be represented.
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_tick_interval.as_secs_f64() / self.speed.abs())
            .unwrap_or(Duration::MAX)
    }

    /// When the next tick is due.
    #[inline]
    pub fn next_tick_at(&self) -> Option<Duration> {
        self.playback.deadline()
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────────

    /// Take `simulation`'s time bounds and start playback.
    ///
    /// On an already initialised controller only the bounds are refreshed:
    /// a running simulation's max time moves forward on every update.
    ///
    /// # Errors
    ///
    /// [`ControlError::MissingTimeBounds`] when the simulation cannot be
    /// played yet; the controller is left as it was.
    pub fn initialize(&mut self, simulation: &Simulation, now: Duration) -> ControlResult<()> {
        let bounds = simulation
            .time_bounds()
            .ok_or_else(|| ControlError::MissingTimeBounds(simulation.id.clone()))?;
        self.bounds = Some(bounds);

        if !self.phase.is_initialized() {
            self.phase = ControllerPhase::Playing;
            self.tick = Tick::ZERO;
            self.derived_tick = Tick::ZERO;
            self.playback.start(now.saturating_add(self.tick_interval()));
            debug!(simulation = %simulation.id, %bounds, "visualization initialized");
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.phase == ControllerPhase::Playing {
            self.phase = ControllerPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == ControllerPhase::Paused {
            self.phase = ControllerPhase::Playing;
        }
    }

    /// Stop the playback timer and forget the bounds and times.  Any phase
    /// moves to `Destroyed`; destroying twice is a no-op.
    pub fn destroy(&mut self) {
        if self.phase == ControllerPhase::Destroyed {
            return;
        }
        self.playback.stop();
        self.bounds = None;
        self.wanted = None;
        self.time_override = None;
        self.phase = ControllerPhase::Destroyed;
        debug!("visualization destroyed");
    }

    // ── Inputs ─────────────────────────────────────────────────────────────────

    /// Change the playback speed; negative plays backwards.  Takes effect
    /// from the next tick.
    pub fn set_speed(&mut self, speed: f64) -> ControlResult<()> {
        if !speed.is_finite() || speed == 0.0 {
            return Err(ControlError::InvalidSpeed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Jump to `time` on the next derivation.  A later call before that
    /// derivation replaces the earlier one.
    pub fn set_visualization_time(&mut self, time: Timestamp) -> ControlResult<()> {
        if !time.is_finite() {
            return Err(ControlError::InvalidTime(time));
        }
        self.time_override = Some(time);
        Ok(())
    }

    /// Fire the playback timer when due.  Returns `true` on a new tick.
    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.playback.fire(now) {
            return false;
        }
        self.tick = self.tick.next();
        self.playback.start(now.saturating_add(self.tick_interval()));
        trace!(tick = %self.tick, "playback tick");
        true
    }

    // ── Derivation ─────────────────────────────────────────────────────────────

    /// Work out the simulation time to show.
    ///
    /// | Situation                     | Result                              |
    /// |-------------------------------|-------------------------------------|
    /// | not initialised               | `None`                              |
    /// | first derivation              | simulation start                    |
    /// | scrub override pending        | override, clamped to the bounds     |
    /// | loading, paused, no new tick  | unchanged                           |
    /// | new tick                      | ± 1 s, clamped to the bounds        |
    pub fn derive_wanted_time(&mut self, is_loading: bool) -> Option<Timestamp> {
        let bounds = self.bounds?;

        let Some(current) = self.wanted else {
            self.derived_tick = self.tick;
            self.wanted = Some(bounds.start);
            return self.wanted;
        };

        if let Some(time) = self.time_override.take() {
            self.wanted = Some(bounds.clamp(time));
            return self.wanted;
        }

        if is_loading || self.tick == self.derived_tick {
            return Some(current);
        }
        self.derived_tick = self.tick;

        if self.is_paused() {
            return Some(current);
        }

        let wanted = bounds.clamp(current + self.speed.signum());
        self.wanted = Some(wanted);
        Some(wanted)
    }
}
