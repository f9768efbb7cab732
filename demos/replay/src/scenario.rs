//! Synthetic scenario: one bus, three stops, two riders.
//!
//! ```text
//!   stop A ──── stop B ──── stop C
//!   t=0..60     t=180..200  t=360
//!   rider-1: A → B
//!   rider-2: B → C
//! ```
//!
//! Saved states are cut every `STATE_PERIOD` seconds and chain without gaps,
//! the way the server writes them while a simulation runs.

use std::collections::BTreeMap;

use anyhow::Result;

use mmv_core::{GeoPoint, PassengerStatus, SimulationStatus, Timestamp, VehicleStatus};
use mmv_model::{
    AllPolylines, Leg, Passenger, PassengerStatusUpdate, Polyline, Simulation, SimulationState, Statistic,
    StatisticUpdate, Stop, Update, UpdateKind, Vehicle, VehicleStatusUpdate, VehicleStopsUpdate,
};

// ── Constants ─────────────────────────────────────────────────────────────────

pub const SIMULATION_ID: &str = "synthetic";
const END_TIME:          Timestamp = 480.0;
const STATE_PERIOD:      Timestamp = 120.0;
const STATISTIC_PERIOD:  Timestamp = 30.0;
const POLYLINES_VERSION: u64 = 1;

const BUS:      &str = "bus-1";
const RIDER_1:  &str = "rider-1";
const RIDER_2:  &str = "rider-2";

/// Everything the replay source serves.
pub struct Scenario {
    pub simulation: Simulation,
    pub states:     Vec<SimulationState>,
    pub polylines:  AllPolylines,
}

fn stops() -> [Stop; 3] {
    let mut a = Stop::new(0.0, Some(60.0), GeoPoint::new(45.5017, -73.5673));
    let mut b = Stop::new(180.0, Some(200.0), GeoPoint::new(45.5088, -73.5540));
    let mut c = Stop::new(360.0, None, GeoPoint::new(45.5200, -73.5800));
    a.label = "Place-d'Armes".into();
    b.label = "Berri-UQAM".into();
    c.label = "Mont-Royal".into();
    [a, b, c]
}

fn leg(assigned: Timestamp, boarding: (usize, Timestamp), alighting: (usize, Timestamp)) -> Leg {
    Leg {
        assigned_vehicle_id: Some(BUS.into()),
        boarding_stop_index: Some(boarding.0),
        alighting_stop_index: Some(alighting.0),
        boarding_time: Some(boarding.1),
        alighting_time: Some(alighting.1),
        assigned_time: Some(assigned),
    }
}

fn statistic(distance: f64) -> Statistic {
    let mut by_field = BTreeMap::new();
    by_field.insert("distance".to_owned(), distance);
    let mut by_mode = BTreeMap::new();
    by_mode.insert("bus".to_owned(), by_field);
    let mut stat = Statistic::new();
    stat.insert("vehicles".to_owned(), by_mode);
    stat
}

fn vehicle_status(status: VehicleStatus) -> UpdateKind {
    UpdateKind::UpdateVehicleStatus(VehicleStatusUpdate { id: BUS.into(), status })
}

fn passenger_status(id: &str, status: PassengerStatus) -> UpdateKind {
    UpdateKind::UpdatePassengerStatus(PassengerStatusUpdate { id: id.into(), status })
}

fn bus_at(current: usize) -> VehicleStopsUpdate {
    let all = stops();
    VehicleStopsUpdate {
        id:             BUS.into(),
        previous_stops: all[..current].to_vec(),
        current_stop:   Some(all[current].clone()),
        next_stops:     all[current + 1..].to_vec(),
    }
}

/// Timed events, sorted by time.
fn events() -> Vec<(Timestamp, UpdateKind)> {
    let mut events = vec![
        (60.0, vehicle_status(VehicleStatus::Enroute)),
        (60.0, passenger_status(RIDER_1, PassengerStatus::Onboard)),
        (150.0, passenger_status(RIDER_2, PassengerStatus::Ready)),
        (180.0, UpdateKind::UpdateVehicleStops(bus_at(1))),
        (180.0, vehicle_status(VehicleStatus::Alighting)),
        (180.0, passenger_status(RIDER_1, PassengerStatus::Complete)),
        (190.0, vehicle_status(VehicleStatus::Boarding)),
        (200.0, vehicle_status(VehicleStatus::Enroute)),
        (200.0, passenger_status(RIDER_2, PassengerStatus::Onboard)),
        (360.0, UpdateKind::UpdateVehicleStops(bus_at(2))),
        (360.0, vehicle_status(VehicleStatus::Alighting)),
        (360.0, passenger_status(RIDER_2, PassengerStatus::Complete)),
        (370.0, vehicle_status(VehicleStatus::Idle)),
        (420.0, vehicle_status(VehicleStatus::Complete)),
    ];

    // Statistics tick every period so no saved state is left without updates.
    // The last one lands on the end time so the final state reaches it.
    let mut t = STATISTIC_PERIOD;
    while t <= END_TIME {
        events.push((t, UpdateKind::UpdateStatistic(StatisticUpdate { statistic: statistic(t * 10.0) })));
        t += STATISTIC_PERIOD;
    }

    // Stable: same-time events keep their listed order.
    events.sort_by(|a, b| a.0.total_cmp(&b.0));
    events
}

fn initial_state() -> SimulationState {
    let [a, b, c] = stops();

    let mut bus = Vehicle::new(BUS, VehicleStatus::Boarding);
    bus.mode = Some("bus".into());
    bus.capacity = Some(40);
    bus.current_stop = Some(a);
    bus.next_stops = vec![b, c];

    let mut rider_1 = Passenger::new(RIDER_1, PassengerStatus::Ready);
    rider_1.current_leg = Some(leg(0.0, (0, 60.0), (1, 180.0)));

    let mut rider_2 = Passenger::new(RIDER_2, PassengerStatus::Assigned);
    rider_2.number_of_passengers = 2;
    rider_2.next_legs = vec![leg(0.0, (1, 200.0), (2, 360.0))];

    SimulationState::new(0.0, 0).with_vehicle(bus).with_passenger(rider_1).with_passenger(rider_2)
}

/// Cut the event stream into chained saved states.
fn saved_states() -> Vec<SimulationState> {
    let events = events();
    let mut states = Vec::new();
    let mut current = initial_state();
    let mut order = current.order;
    let mut next = 0;

    while current.timestamp < END_TIME {
        let cut = current.timestamp + STATE_PERIOD;
        while next < events.len() && (events[next].0 < cut || cut >= END_TIME) {
            let (timestamp, kind) = events[next].clone();
            order += 1;
            current = current.with_update(Update::new(timestamp, order, kind));
            next += 1;
        }

        let env = current.environment_at(cut);
        states.push(current);

        order += 1;
        current = SimulationState {
            timestamp:  cut,
            order,
            passengers: env.passengers,
            vehicles:   env.vehicles,
            statistic:  env.statistic,
            updates:    Vec::new(),
        };
    }
    states
}

fn polylines() -> Result<AllPolylines> {
    let [a, b, c] = stops();
    let bend = GeoPoint::new(45.5150, -73.5620);

    let mut all = AllPolylines::new(POLYLINES_VERSION);
    all.by_vehicle.insert(BUS.into(), vec![
        Polyline::new(Vec::new(), Vec::new())?,
        Polyline::straight(a.position, b.position),
        Polyline::new(vec![b.position, bend, c.position], vec![0.4, 0.6])?,
    ]);
    Ok(all)
}

pub fn build() -> Result<Scenario> {
    let states = saved_states();

    let mut simulation = Simulation::new(SIMULATION_ID, SimulationStatus::Completed);
    simulation.name = "Synthetic bus line".into();
    simulation.simulation_start_time = Some(0.0);
    simulation.simulation_end_time = Some(END_TIME);
    simulation.last_update_order = states.last().map(|s| s.end_order());
    simulation.polylines_version = POLYLINES_VERSION;

    Ok(Scenario { simulation, states, polylines: polylines()? })
}
