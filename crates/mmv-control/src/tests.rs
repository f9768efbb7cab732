//! Unit tests for mmv-control.

use std::time::Duration;

use mmv_core::{SimulationId, SimulationStatus, VehicleStatus};
use mmv_model::{Simulation, SimulationState, Statistic, StatisticUpdate, Update, UpdateKind, Vehicle};

use crate::{DataSource, StatesRequest};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn finished(start: f64, end: f64) -> Simulation {
    let mut sim = Simulation::new("sim", SimulationStatus::Completed);
    sim.simulation_start_time = Some(start);
    sim.simulation_end_time = Some(end);
    sim
}

/// Linked state `k`: timestamp `10k`, order `3k`, updates at `+3` and `+6`.
fn chained(k: u64) -> SimulationState {
    let ts = 10.0 * k as f64;
    let stat = |t: f64, order: u64| {
        Update::new(t, order, UpdateKind::UpdateStatistic(StatisticUpdate { statistic: Statistic::new() }))
    };
    SimulationState::new(ts, 3 * k)
        .with_vehicle(Vehicle::new("bus", VehicleStatus::Idle))
        .with_update(stat(ts + 3.0, 3 * k + 1))
        .with_update(stat(ts + 6.0, 3 * k + 2))
}

#[derive(Default)]
struct Recorder {
    states:    Vec<StatesRequest>,
    polylines: Vec<SimulationId>,
}

impl DataSource for Recorder {
    fn request_states(&mut self, request: &StatesRequest) {
        self.states.push(request.clone());
    }

    fn request_polylines(&mut self, simulation_id: &SimulationId) {
        self.polylines.push(simulation_id.clone());
    }
}

// ── Timer / Debouncer ─────────────────────────────────────────────────────────

#[cfg(test)]
mod pacing {
    use super::*;
    use crate::{Debouncer, Timer};

    #[test]
    fn timer_fires_once() {
        let mut timer = Timer::stopped();
        assert!(!timer.fire(ms(0)));
        timer.start(ms(500));
        assert!(timer.is_armed());
        assert!(!timer.fire(ms(499)));
        assert!(timer.fire(ms(500)));
        assert!(!timer.fire(ms(600)));
        timer.start(ms(700));
        timer.stop();
        assert!(!timer.is_due(ms(1000)));
    }

    #[test]
    fn idle_debouncer_fires_immediately() {
        let mut d = Debouncer::new(ms(800));
        assert_eq!(d.request(ms(0), 1), Some(1));
        assert_eq!(d.last_fire(), Some(ms(0)));
        assert_eq!(d.request(ms(900), 2), Some(2));
    }

    #[test]
    fn burst_collapses_to_newest_arguments() {
        let mut d = Debouncer::new(ms(800));
        assert_eq!(d.request(ms(0), "first"), Some("first"));

        assert_eq!(d.request(ms(100), "a"), None);
        assert_eq!(d.request(ms(200), "b"), None);
        assert_eq!(d.deadline(), Some(ms(800)));

        assert_eq!(d.poll(ms(799)), None);
        assert_eq!(d.poll(ms(800)), Some("b"));
        assert_eq!(d.poll(ms(2000)), None);
        assert_eq!(d.last_fire(), Some(ms(800)));
    }

    #[test]
    fn cancel_and_reset() {
        let mut d = Debouncer::new(ms(800));
        d.request(ms(0), 1);
        d.request(ms(100), 2);
        d.cancel();
        assert!(!d.is_pending());
        assert_eq!(d.poll(ms(800)), None);
        assert_eq!(d.request(ms(200), 3), None);
        d.reset();
        assert_eq!(d.request(ms(300), 4), Some(4));
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod controller {
    use super::*;
    use crate::{ControlError, ControllerPhase, VisualizationController};

    fn started(sim: &Simulation) -> VisualizationController {
        let mut c = VisualizationController::new(ms(1000));
        c.initialize(sim, ms(0)).unwrap();
        c
    }

    #[test]
    fn phases() {
        let mut c = VisualizationController::new(ms(1000));
        assert_eq!(c.phase(), ControllerPhase::Uninitialized);
        assert_eq!(c.derive_wanted_time(false), None);

        let pending = Simulation::new("sim", SimulationStatus::Starting);
        assert!(matches!(c.initialize(&pending, ms(0)), Err(ControlError::MissingTimeBounds(_))));
        assert_eq!(c.phase(), ControllerPhase::Uninitialized);

        c.initialize(&finished(0.0, 100.0), ms(0)).unwrap();
        assert_eq!(c.phase(), ControllerPhase::Playing);
        assert_eq!(c.next_tick_at(), Some(ms(1000)));

        c.pause();
        assert_eq!(c.phase(), ControllerPhase::Paused);
        c.resume();
        assert_eq!(c.phase(), ControllerPhase::Playing);

        c.destroy();
        assert_eq!(c.phase(), ControllerPhase::Destroyed);
        assert_eq!(c.bounds(), None);
        assert_eq!(c.next_tick_at(), None);
        assert_eq!(c.derive_wanted_time(false), None);

        c.initialize(&finished(0.0, 100.0), ms(5000)).unwrap();
        assert_eq!(c.phase(), ControllerPhase::Playing);
        assert_eq!(c.derive_wanted_time(false), Some(0.0));
    }

    #[test]
    fn reinitialize_only_refreshes_bounds() {
        let mut c = started(&finished(0.0, 100.0));
        c.initialize(&finished(0.0, 200.0), ms(300)).unwrap();
        assert_eq!(c.bounds().unwrap().max, 200.0);
        assert_eq!(c.next_tick_at(), Some(ms(1000)));
    }

    #[test]
    fn ticks_advance_one_second() {
        let mut c = started(&finished(10.0, 100.0));
        assert_eq!(c.derive_wanted_time(false), Some(10.0));
        assert_eq!(c.derive_wanted_time(false), Some(10.0));

        assert!(!c.poll(ms(999)));
        assert!(c.poll(ms(1000)));
        assert_eq!(c.derive_wanted_time(false), Some(11.0));
        assert_eq!(c.derive_wanted_time(false), Some(11.0));
    }

    #[test]
    fn loading_and_pause_freeze_time() {
        let mut c = started(&finished(0.0, 100.0));
        c.derive_wanted_time(false);

        c.poll(ms(1000));
        assert_eq!(c.derive_wanted_time(true), Some(0.0));
        assert_eq!(c.derive_wanted_time(false), Some(1.0));

        c.pause();
        c.poll(ms(2000));
        assert_eq!(c.derive_wanted_time(false), Some(1.0));
        c.resume();
        c.poll(ms(3000));
        assert_eq!(c.derive_wanted_time(false), Some(2.0));
    }

    #[test]
    fn override_wins_once_and_is_clamped() {
        let mut c = started(&finished(0.0, 100.0));
        c.derive_wanted_time(false);

        c.set_visualization_time(50.0).unwrap();
        c.poll(ms(1000));
        assert_eq!(c.derive_wanted_time(false), Some(50.0));
        // The tick is still pending and applies on the next derivation.
        assert_eq!(c.derive_wanted_time(false), Some(51.0));

        c.set_visualization_time(1e9).unwrap();
        assert_eq!(c.derive_wanted_time(true), Some(100.0));
        c.set_visualization_time(-5.0).unwrap();
        assert_eq!(c.derive_wanted_time(false), Some(0.0));

        assert!(matches!(c.set_visualization_time(f64::NAN), Err(ControlError::InvalidTime(_))));
    }

    #[test]
    fn forward_playback_stops_at_max() {
        let mut c = started(&finished(0.0, 100.0));
        c.derive_wanted_time(false);
        c.set_visualization_time(99.5).unwrap();
        c.derive_wanted_time(false);
        c.poll(ms(1000));
        assert_eq!(c.derive_wanted_time(false), Some(100.0));
    }

    #[test]
    fn rejects_bad_speed() {
        let mut c = VisualizationController::new(ms(1000));
        assert!(matches!(c.set_speed(0.0), Err(ControlError::InvalidSpeed(_))));
        assert!(c.set_speed(f64::INFINITY).is_err());
        assert_eq!(c.speed(), 1.0);
        c.set_speed(4.0).unwrap();
        assert_eq!(c.tick_interval(), ms(250));
    }

    #[test]
    fn extreme_speeds_do_not_overflow_the_clock() {
        let mut c = started(&finished(0.0, 100.0));
        c.derive_wanted_time(false);

        c.set_speed(1e-20).unwrap();
        assert_eq!(c.tick_interval(), Duration::MAX);
        assert!(c.poll(ms(1000)));
        assert_eq!(c.next_tick_at(), Some(Duration::MAX));
        assert_eq!(c.derive_wanted_time(false), Some(1.0));
        assert!(!c.poll(ms(1_000_000)));

        c.set_speed(1e300).unwrap();
        assert_eq!(c.tick_interval(), Duration::ZERO);
    }

    #[test]
    fn destroy_from_any_phase() {
        let mut c = VisualizationController::new(ms(1000));
        c.destroy();
        assert_eq!(c.phase(), ControllerPhase::Destroyed);
        c.destroy();
        assert_eq!(c.phase(), ControllerPhase::Destroyed);

        c.initialize(&finished(0.0, 100.0), ms(0)).unwrap();
        assert_eq!(c.phase(), ControllerPhase::Playing);
    }

    #[test]
    fn reverse_playback_at_double_speed() {
        let mut c = VisualizationController::new(ms(1000));
        c.set_speed(-2.0).unwrap();
        c.initialize(&finished(0.0, 100.0), ms(0)).unwrap();
        assert_eq!(c.tick_interval(), ms(500));

        c.derive_wanted_time(false);
        c.set_visualization_time(3.0).unwrap();
        assert_eq!(c.derive_wanted_time(false), Some(3.0));

        let mut seen = Vec::new();
        for step in 1..=5 {
            assert!(c.poll(ms(500 * step)));
            seen.push(c.derive_wanted_time(false).unwrap());
        }
        // One second per 500 ms tick: two simulation seconds per real second.
        assert_eq!(seen, vec![2.0, 1.0, 0.0, 0.0, 0.0]);
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::{ControlError, VisualizerConfig};

    #[test]
    fn defaults() {
        let c = VisualizerConfig::default();
        assert_eq!(c.states_debounce_ms, 800);
        assert_eq!(c.polylines_debounce_ms, 800);
        assert_eq!(c.base_tick_interval_ms, 1000);
        assert_eq!(c.fetch_margin_secs, 30.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: VisualizerConfig = serde_json::from_str(r#"{ "states_debounce_ms": 250 }"#).unwrap();
        assert_eq!(c.states_debounce_ms, 250);
        assert_eq!(c.base_tick_interval_ms, 1000);
    }

    #[test]
    fn invalid_values() {
        let zero_tick = VisualizerConfig { base_tick_interval_ms: 0, ..Default::default() };
        assert!(matches!(zero_tick.validate(), Err(ControlError::Config(_))));
        let bad_margin = VisualizerConfig { fetch_margin_secs: -1.0, ..Default::default() };
        assert!(bad_margin.validate().is_err());
    }
}

// ── Visualizer ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod visualizer {
    use mmv_animation::Frame;
    use mmv_core::{Timestamp, VehicleId};
    use mmv_model::AllPolylines;

    use super::*;
    use crate::{ControllerPhase, FrameObserver, Request, StatesResponse, Visualizer, VisualizerConfig};

    fn loaded() -> (Visualizer, Recorder) {
        let mut vis = Visualizer::new(VisualizerConfig::default()).unwrap();
        let mut source = Recorder::default();
        vis.update_simulation(finished(0.0, 36.0), ms(0)).unwrap();
        assert!(vis.frame(ms(0), &mut source).is_none());
        vis.on_states_received(states_for("sim"));
        vis.on_polylines_received(&"sim".into(), AllPolylines::new(0));
        (vis, source)
    }

    fn states_for(simulation_id: &str) -> StatesResponse {
        StatesResponse {
            simulation_id:        simulation_id.into(),
            states:               (0..4).map(chained).collect(),
            state_orders_to_keep: vec![],
        }
    }

    #[test]
    fn first_frame_requests_data() {
        let mut vis = Visualizer::new(VisualizerConfig::default()).unwrap();
        let mut source = Recorder::default();
        assert!(vis.frame(ms(0), &mut source).is_none());

        vis.update_simulation(finished(0.0, 36.0), ms(0)).unwrap();
        assert!(vis.frame(ms(0), &mut source).is_none());
        assert!(vis.is_loading());
        assert_eq!(source.states.len(), 1);
        assert_eq!(source.states[0].visualization_time, 0.0);
        assert!(source.states[0].known_orders.is_empty());
        assert_eq!(source.polylines, vec![SimulationId::from("sim")]);

        // In flight: nothing new goes out.
        vis.frame(ms(900), &mut source);
        assert_eq!(source.states.len(), 1);
        assert_eq!(source.polylines.len(), 1);
    }

    #[test]
    fn covered_window_yields_frames() {
        let (mut vis, mut source) = loaded();
        let frame = vis.frame(ms(100), &mut source).unwrap();
        assert_eq!(frame.time, 0.0);
        assert!(frame.vehicles.contains_key(&VehicleId::from("bus")));
        assert!(!vis.is_loading());
        assert!(!vis.continuity().should_request_more_states);
        assert_eq!(source.states.len(), 1);
        assert_eq!(source.polylines.len(), 1);

        let frame = vis.frame(ms(1000), &mut source).unwrap();
        assert_eq!(frame.time, 1.0);
        assert_eq!(vis.animated().unwrap().window.end, 36.0);
    }

    #[test]
    fn failed_fetch_is_retried_after_debounce() {
        let mut vis = Visualizer::new(VisualizerConfig::default()).unwrap();
        let mut source = Recorder::default();
        vis.update_simulation(finished(0.0, 36.0), ms(0)).unwrap();

        vis.frame(ms(0), &mut source);
        vis.on_states_failed(&"sim".into(), "timeout");
        assert!(!vis.is_fetching_states());

        vis.frame(ms(100), &mut source);
        vis.frame(ms(500), &mut source);
        assert_eq!(source.states.len(), 1);

        vis.frame(ms(800), &mut source);
        assert_eq!(source.states.len(), 2);
        assert!(vis.is_fetching_states());
    }

    #[test]
    fn stale_polylines_are_refetched() {
        let (mut vis, mut source) = loaded();
        vis.frame(ms(100), &mut source);
        assert_eq!(source.polylines.len(), 1);

        let mut sim = finished(0.0, 36.0);
        sim.polylines_version = 2;
        vis.update_simulation(sim, ms(900)).unwrap();
        vis.frame(ms(900), &mut source);
        assert_eq!(source.polylines.len(), 2);
    }

    #[test]
    fn switching_simulation_drops_cached_states() {
        let (mut vis, mut source) = loaded();
        vis.frame(ms(100), &mut source);
        assert_eq!(vis.cache().len(), 4);

        let mut other = finished(0.0, 36.0);
        other.id = "other".into();
        vis.update_simulation(other, ms(200)).unwrap();
        assert!(vis.cache().is_empty());
        assert!(vis.animated().is_none());
        assert!(vis.frame(ms(200), &mut source).is_none());
        assert_eq!(source.states.last().unwrap().simulation_id, SimulationId::from("other"));
    }

    #[test]
    fn answers_for_a_previous_simulation_are_dropped() {
        let mut vis = Visualizer::new(VisualizerConfig::default()).unwrap();
        let mut source = Recorder::default();
        vis.update_simulation(finished(0.0, 36.0), ms(0)).unwrap();
        vis.frame(ms(0), &mut source);

        let mut other = finished(0.0, 36.0);
        other.id = "other".into();
        vis.update_simulation(other, ms(100)).unwrap();
        vis.frame(ms(100), &mut source);
        assert!(vis.is_fetching_states());
        assert!(vis.is_fetching_polylines());

        // The first simulation's answers land after the switch.
        let previous = SimulationId::from("sim");
        assert_eq!(vis.on_states_received(states_for("sim")), 0);
        vis.on_polylines_received(&previous, AllPolylines::new(0));
        vis.on_states_failed(&previous, "late");
        vis.on_polylines_failed(&previous, "late");
        assert!(vis.cache().is_empty());
        assert!(vis.polylines().is_none());
        assert!(vis.is_fetching_states());
        assert!(vis.is_fetching_polylines());

        assert_eq!(vis.on_states_received(states_for("other")), 4);
        assert!(!vis.is_fetching_states());
    }

    #[test]
    fn destroy_stops_playback_and_pending_requests() {
        let mut vis = Visualizer::new(VisualizerConfig::default()).unwrap();
        let mut source = Recorder::default();
        let sim = SimulationId::from("sim");
        vis.update_simulation(finished(0.0, 36.0), ms(0)).unwrap();

        // Both fetches fail, so the retries wait on their debouncers.
        vis.frame(ms(0), &mut source);
        vis.on_states_failed(&sim, "timeout");
        vis.on_polylines_failed(&sim, "timeout");
        vis.frame(ms(100), &mut source);
        assert_eq!(source.states.len(), 1);
        assert_eq!(source.polylines.len(), 1);
        assert!(vis.controller().next_tick_at().is_some());

        vis.destroy();
        assert_eq!(vis.controller().phase(), ControllerPhase::Destroyed);
        assert_eq!(vis.controller().next_tick_at(), None);

        for t in [800, 1000, 5000] {
            assert!(vis.frame(ms(t), &mut source).is_none());
        }
        assert_eq!(source.states.len(), 1);
        assert_eq!(source.polylines.len(), 1);

        // Initialising again restarts playback and fetching.
        vis.update_simulation(finished(0.0, 36.0), ms(6000)).unwrap();
        assert_eq!(vis.controller().phase(), ControllerPhase::Playing);
        vis.frame(ms(6000), &mut source);
        assert_eq!(source.states.len(), 2);
        assert_eq!(source.polylines.len(), 2);
        assert_eq!(source.states[1].visualization_time, 0.0);
    }

    #[derive(Default)]
    struct Log {
        frames:   Vec<Timestamp>,
        requests: usize,
        ended:    Option<Option<Timestamp>>,
    }

    impl FrameObserver for Log {
        fn on_frame(&mut self, _now: Duration, frame: &Frame) {
            self.frames.push(frame.time);
        }

        fn on_request(&mut self, _now: Duration, request: &Request) {
            assert!(matches!(request, Request::States(_) | Request::Polylines(_)));
            self.requests += 1;
        }

        fn on_end(&mut self, last_time: Option<Timestamp>) {
            self.ended = Some(last_time);
        }
    }

    #[test]
    fn observer_sees_frames_requests_and_end() {
        let mut vis = Visualizer::new(VisualizerConfig::default()).unwrap();
        let mut source = Recorder::default();
        let mut log = Log::default();
        vis.update_simulation(finished(0.0, 36.0), ms(0)).unwrap();

        vis.frame_observed(ms(0), &mut source, &mut log);
        assert_eq!(log.requests, 2);
        assert!(log.frames.is_empty());

        vis.on_states_received(states_for("sim"));
        vis.frame_observed(ms(100), &mut source, &mut log);
        vis.frame_observed(ms(1000), &mut source, &mut log);
        assert_eq!(log.frames, vec![0.0, 1.0]);

        vis.end(&mut log);
        assert_eq!(log.ended, Some(Some(1.0)));
        assert!(vis.frame(ms(2000), &mut source).is_none());
    }
}
