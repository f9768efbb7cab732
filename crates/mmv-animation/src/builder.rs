//! Fluent builder assembling an [`AnimatedEnvironment`].

use std::collections::BTreeMap;

use tracing::{debug, error};

use mmv_model::{AllPolylines, SimulationEnvironment, SimulationState};
use mmv_timeline::{
    Fragment, IntervalData, NotDisplayedReason, StatusChange, Timeline, Window, splice_statuses,
};

use crate::environment::{AnimatedEnvironment, AnimatedPassenger, AnimatedVehicle, StopInfo};
use crate::events::StatusEvents;
use crate::passenger::passenger_fragments;
use crate::vehicle::vehicle_fragments;

/// Fluent builder for [`AnimatedEnvironment`].
///
/// # Inputs
///
/// | Method          | Default          | Used for                                 |
/// |-----------------|------------------|------------------------------------------|
/// | `new(window)`   | required         | time span every timeline covers          |
/// | `.polylines(p)` | no polylines     | stop positions and moving segments       |
/// | `.states(s)`    | no status events | status overlay and initial statuses      |
///
/// # Example
///
/// ```rust,ignore
/// let animated = AnimationBuilder::new(Window::new(first.timestamp, last.timestamp))
///     .polylines(&polylines)
///     .states(&continuous_states)
///     .build(&environment);
/// let frame = animated.at(wanted_time);
/// ```
pub struct AnimationBuilder<'a> {
    window:    Window,
    polylines: Option<&'a AllPolylines>,
    states:    &'a [SimulationState],
}

impl<'a> AnimationBuilder<'a> {
    pub fn new(window: Window) -> Self {
        Self { window, polylines: None, states: &[] }
    }

    /// Polylines of every vehicle, at the simulation's current version.
    pub fn polylines(mut self, polylines: &'a AllPolylines) -> Self {
        self.polylines = Some(polylines);
        self
    }

    /// The continuous run of states the window was derived from.
    pub fn states(mut self, states: &'a [SimulationState]) -> Self {
        self.states = states;
        self
    }

    /// Build one timeline per passenger and vehicle of `environment`.
    ///
    /// Never fails: an entity whose timeline would be corrupt is shown as
    /// not displayed for the whole window instead.
    pub fn build(self, environment: &SimulationEnvironment) -> AnimatedEnvironment {
        let window = match self.window.validate() {
            Ok(()) => self.window,
            Err(err) => {
                error!(%err, "invalid animation window; collapsing to its start");
                Window::new(self.window.start, self.window.start)
            }
        };
        let events = StatusEvents::collect(self.states);

        let mut vehicles = BTreeMap::new();
        let mut stops: BTreeMap<_, StopInfo> = BTreeMap::new();
        for (id, vehicle) in &environment.vehicles {
            for stop in vehicle.all_stops() {
                stops.entry(stop.id()).or_insert_with(|| StopInfo {
                    label:    stop.label.clone(),
                    position: stop.position,
                });
            }

            let fragments = vehicle_fragments(vehicle, self.polylines.and_then(|p| p.for_vehicle(id)), window);
            let initial = events.vehicle_initial.get(id).copied().unwrap_or(vehicle.status);
            let timeline = assemble(window, fragments, initial, events.vehicle(id), id.as_str());
            vehicles.insert(id.clone(), AnimatedVehicle { vehicle: vehicle.clone(), timeline });
        }

        let mut passengers = BTreeMap::new();
        for (id, passenger) in &environment.passengers {
            let fragments = passenger_fragments(passenger, &environment.vehicles, self.polylines, window);
            let initial = events.passenger_initial.get(id).copied().unwrap_or(passenger.status);
            let timeline = assemble(window, fragments, initial, events.passenger(id), id.as_str());
            passengers.insert(id.clone(), AnimatedPassenger { passenger: passenger.clone(), timeline });
        }

        debug!(
            passengers = passengers.len(),
            vehicles = vehicles.len(),
            stops = stops.len(),
            start = window.start,
            end = window.end,
            "animated environment built"
        );

        AnimatedEnvironment {
            window,
            timestamp: environment.timestamp,
            order: environment.order,
            statistic: environment.statistic.clone(),
            passengers,
            vehicles,
            stops,
        }
    }
}

/// Gap-fill, overlay statuses and verify; fall back to a whole-window
/// `InconsistentTimeline` interval on any violation.
pub fn assemble<S: Clone>(
    window: Window,
    fragments: Vec<Fragment>,
    initial: S,
    events: &[StatusChange<S>],
    entity: &str,
) -> Timeline<S> {
    Timeline::build(window, fragments)
        .and_then(|timeline| splice_statuses(timeline, initial.clone(), events))
        .unwrap_or_else(|err| {
            error!(%err, entity, "inconsistent animation timeline");
            Timeline::whole(window, initial, IntervalData::NotDisplayed(NotDisplayedReason::InconsistentTimeline))
        })
}
