//! `Visualizer` — the per-frame pull pipeline.
//!
//! # One frame
//!
//! ```text
//! ① poll        playback timer → maybe a new tick
//! ② wanted      controller derives the time to show
//! ③ continuity  tracker finds the linked run around it
//! ④ fetch       debounced states / polylines requests to the DataSource
//! ⑤ animate     snapshot at the wanted time → timelines (only on change)
//! ⑥ sample      AnimatedEnvironment::at(wanted) → Frame
//! ```
//!
//! While the wanted time is not covered the visualizer is loading: the
//! wanted time is frozen and frames are re-sampled from the last good
//! environment.

use std::time::Duration;

use tracing::{debug, trace, warn};

use mmv_animation::{AnimatedEnvironment, AnimationBuilder, Frame};
use mmv_continuity::{ContinuityTracker, ContinuityWindow, StateCache};
use mmv_core::{SimulationId, Timestamp};
use mmv_model::{AllPolylines, Simulation};
use mmv_timeline::Window;

use crate::config::VisualizerConfig;
use crate::controller::VisualizationController;
use crate::debounce::Debouncer;
use crate::observer::{FrameObserver, NoopObserver};
use crate::source::{DataSource, Request, StatesRequest, StatesResponse};
use crate::ControlResult;

/// What the current animation was built from.
#[derive(Copy, Clone, Debug, PartialEq)]
struct AnimationKey {
    start:             Timestamp,
    end:               Timestamp,
    order:             u64,
    polylines_version: Option<u64>,
}

pub struct Visualizer {
    config:             VisualizerConfig,
    simulation:         Option<Simulation>,
    cache:              StateCache,
    tracker:            ContinuityTracker,
    continuity:         ContinuityWindow,
    controller:         VisualizationController,
    states_debounce:    Debouncer<StatesRequest>,
    polylines_debounce: Debouncer<SimulationId>,
    fetching_states:    bool,
    fetching_polylines: bool,
    polylines:          Option<AllPolylines>,
    animated:           Option<AnimatedEnvironment>,
    animation_key:      Option<AnimationKey>,
    is_loading:         bool,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            tracker: ContinuityTracker::new(config.fetch_margin_secs)?,
            controller: VisualizationController::new(config.base_tick_interval()),
            states_debounce: Debouncer::new(config.states_debounce()),
            polylines_debounce: Debouncer::new(config.polylines_debounce()),
            config,
            simulation: None,
            cache: StateCache::new(),
            continuity: ContinuityWindow::empty(),
            fetching_states: false,
            fetching_polylines: false,
            polylines: None,
            animated: None,
            animation_key: None,
            is_loading: true,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    #[inline]
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    #[inline]
    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    #[inline]
    pub fn continuity(&self) -> &ContinuityWindow {
        &self.continuity
    }

    #[inline]
    pub fn controller(&self) -> &VisualizationController {
        &self.controller
    }

    /// Playback inputs: pause, resume, speed, scrub.
    #[inline]
    pub fn controller_mut(&mut self) -> &mut VisualizationController {
        &mut self.controller
    }

    #[inline]
    pub fn polylines(&self) -> Option<&AllPolylines> {
        self.polylines.as_ref()
    }

    /// The last good animated environment.
    #[inline]
    pub fn animated(&self) -> Option<&AnimatedEnvironment> {
        self.animated.as_ref()
    }

    /// `true` while no continuous run covers the wanted time.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[inline]
    pub fn is_fetching_states(&self) -> bool {
        self.fetching_states
    }

    #[inline]
    pub fn is_fetching_polylines(&self) -> bool {
        self.fetching_polylines
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────────

    /// Select or refresh the visualized simulation.
    ///
    /// Switching to another simulation drops everything fetched for the
    /// previous one.  The simulation is stored even when it cannot be
    /// played yet.
    ///
    /// # Errors
    ///
    /// [`ControlError::MissingTimeBounds`][crate::ControlError::MissingTimeBounds]
    /// while the simulation has no playable bounds.
    pub fn update_simulation(&mut self, simulation: Simulation, now: Duration) -> ControlResult<()> {
        if self.simulation.as_ref().is_some_and(|s| s.id != simulation.id) {
            debug!(from = ?self.simulation.as_ref().map(|s| &s.id), to = %simulation.id, "switching simulation");
            self.reset();
        }
        let result = self.controller.initialize(&simulation, now);
        self.simulation = Some(simulation);
        result
    }

    /// Stop playback and every pending request.  Fetched data is kept.
    pub fn destroy(&mut self) {
        self.controller.destroy();
        self.states_debounce.cancel();
        self.polylines_debounce.cancel();
        self.is_loading = true;
    }

    /// Report the end of the visualization to `observer`, then destroy.
    pub fn end(&mut self, observer: &mut impl FrameObserver) {
        observer.on_end(self.controller.wanted_time());
        self.destroy();
    }

    fn reset(&mut self) {
        self.destroy();
        self.controller = VisualizationController::new(self.config.base_tick_interval());
        self.states_debounce.reset();
        self.polylines_debounce.reset();
        self.cache.clear();
        self.continuity = ContinuityWindow::empty();
        self.fetching_states = false;
        self.fetching_polylines = false;
        self.polylines = None;
        self.animated = None;
        self.animation_key = None;
    }

    // ── Completion handlers ────────────────────────────────────────────────────
    //
    // Every handler names the simulation its request was made for.  Answers
    // for any other simulation arrive after a switch and are dropped.

    fn is_current(&self, simulation_id: &SimulationId) -> bool {
        let current = self.simulation.as_ref().is_some_and(|s| s.id == *simulation_id);
        if !current {
            debug!(stale = %simulation_id, "dropping answer for another simulation");
        }
        current
    }

    /// Merge a states answer into the cache.  Returns the number of states
    /// accepted.
    pub fn on_states_received(&mut self, response: StatesResponse) -> usize {
        if !self.is_current(&response.simulation_id) {
            return 0;
        }
        self.fetching_states = false;
        let dropped = self.cache.retain_orders(&response.state_orders_to_keep);
        let accepted = self.cache.extend(response.states);
        debug!(accepted, dropped, cached = self.cache.len(), "states received");
        accepted
    }

    pub fn on_states_failed(&mut self, simulation_id: &SimulationId, reason: &str) {
        if !self.is_current(simulation_id) {
            return;
        }
        self.fetching_states = false;
        warn!(reason, "states request failed");
    }

    pub fn on_polylines_received(&mut self, simulation_id: &SimulationId, polylines: AllPolylines) {
        if !self.is_current(simulation_id) {
            return;
        }
        self.fetching_polylines = false;
        debug!(version = polylines.version, vehicles = polylines.by_vehicle.len(), "polylines received");
        self.polylines = Some(polylines);
    }

    pub fn on_polylines_failed(&mut self, simulation_id: &SimulationId, reason: &str) {
        if !self.is_current(simulation_id) {
            return;
        }
        self.fetching_polylines = false;
        warn!(reason, "polylines request failed");
    }

    // ── Frame ──────────────────────────────────────────────────────────────────

    /// Run one pass of the pipeline at real time `now`.
    ///
    /// Returns `None` until a first environment could be animated.
    pub fn frame(&mut self, now: Duration, source: &mut impl DataSource) -> Option<Frame> {
        self.frame_observed(now, source, &mut NoopObserver)
    }

    /// [`frame`](Self::frame) with callbacks to `observer`.
    pub fn frame_observed(
        &mut self,
        now: Duration,
        source: &mut impl DataSource,
        observer: &mut impl FrameObserver,
    ) -> Option<Frame> {
        let simulation_id = self.simulation.as_ref()?.id.clone();

        self.controller.poll(now);
        let wanted = self.controller.derive_wanted_time(self.is_loading)?;
        let bounds = self.controller.bounds()?;

        self.continuity = self.tracker.compute(&self.cache, wanted, &bounds);
        let covered = self.continuity.covers(wanted);
        self.is_loading = !covered;

        self.schedule_states(now, wanted, covered, &simulation_id, source, observer);
        self.schedule_polylines(now, &simulation_id, source, observer);

        if covered {
            self.refresh_animation(wanted);
        }

        let frame = self.animated.as_ref()?.at(wanted);
        observer.on_frame(now, &frame);
        Some(frame)
    }

    fn schedule_states(
        &mut self,
        now: Duration,
        wanted: Timestamp,
        covered: bool,
        simulation_id: &SimulationId,
        source: &mut impl DataSource,
        observer: &mut impl FrameObserver,
    ) {
        if self.fetching_states {
            return;
        }
        let wants_more = !covered || self.continuity.should_request_more_states;
        if !wants_more {
            self.states_debounce.cancel();
            return;
        }

        let request = StatesRequest {
            simulation_id:      simulation_id.clone(),
            visualization_time: wanted,
            known_orders:       self.continuity.known_orders(&self.cache),
        };
        let ready = self.states_debounce.request(now, request).or_else(|| self.states_debounce.poll(now));
        let Some(request) = ready else {
            trace!(deadline = ?self.states_debounce.deadline(), "states request deferred");
            return;
        };

        self.fetching_states = true;
        debug!(wanted, known = request.known_orders.len(), "requesting states");
        observer.on_request(now, &Request::States(request.clone()));
        source.request_states(&request);
    }

    fn schedule_polylines(
        &mut self,
        now: Duration,
        simulation_id: &SimulationId,
        source: &mut impl DataSource,
        observer: &mut impl FrameObserver,
    ) {
        if self.fetching_polylines {
            return;
        }
        let version = self.simulation.as_ref().map_or(0, |s| s.polylines_version);
        if self.polylines.as_ref().is_some_and(|p| !p.is_stale(version)) {
            self.polylines_debounce.cancel();
            return;
        }

        let ready = self
            .polylines_debounce
            .request(now, simulation_id.clone())
            .or_else(|| self.polylines_debounce.poll(now));
        let Some(id) = ready else { return };

        self.fetching_polylines = true;
        debug!(version, "requesting polylines");
        observer.on_request(now, &Request::Polylines(id.clone()));
        source.request_polylines(&id);
    }

    /// Rebuild the animated environment when its inputs changed.
    fn refresh_animation(&mut self, wanted: Timestamp) {
        let (Some(first), Some(last)) =
            (self.continuity.first_continuous_state, self.continuity.last_continuous_state)
        else {
            return;
        };
        let states = self.continuity.continuous_states(&self.cache);
        let anchor = states.partition_point(|s| s.timestamp <= wanted).saturating_sub(1);
        let Some(state) = states.get(anchor) else { return };

        let environment = state.environment_at(wanted);
        let key = AnimationKey {
            start:             first.timestamp,
            end:               last.timestamp,
            order:             environment.order,
            polylines_version: self.polylines.as_ref().map(|p| p.version),
        };
        if self.animation_key == Some(key) {
            return;
        }

        let mut builder = AnimationBuilder::new(Window::new(first.timestamp, last.timestamp)).states(states);
        if let Some(polylines) = &self.polylines {
            builder = builder.polylines(polylines);
        }
        self.animated = Some(builder.build(&environment));
        self.animation_key = Some(key);
        trace!(order = key.order, start = key.start, end = key.end, "animation rebuilt");
    }
}
