//! Passengers, vehicles, stops and legs as the server describes them.
//!
//! Field names on the wire are camelCase.  Optional fields default to `None`
//! when absent so that partially filled entities from older saves still load.

use serde::{Deserialize, Serialize};

use mmv_core::{GeoPoint, PassengerId, PassengerStatus, StopId, Timestamp, VehicleId, VehicleStatus};

// ── Leg ───────────────────────────────────────────────────────────────────────

/// One ride of a passenger trip on a single vehicle.
///
/// Stop indices point into the assigned vehicle's concatenated stop list
/// (`previous_stops ++ current_stop ++ next_stops`).  When present the times
/// satisfy `assigned_time ≤ boarding_time ≤ alighting_time`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Leg {
    pub assigned_vehicle_id: Option<VehicleId>,
    pub boarding_stop_index: Option<usize>,
    pub alighting_stop_index: Option<usize>,
    pub boarding_time: Option<Timestamp>,
    pub alighting_time: Option<Timestamp>,
    pub assigned_time: Option<Timestamp>,
}

// ── Passenger ─────────────────────────────────────────────────────────────────

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id:     PassengerId,
    #[serde(default)]
    pub name:   Option<String>,
    pub status: PassengerStatus,
    #[serde(default)]
    pub previous_legs: Vec<Leg>,
    #[serde(default)]
    pub current_leg: Option<Leg>,
    #[serde(default)]
    pub next_legs: Vec<Leg>,
    /// Group size travelling under this id.
    #[serde(default = "one")]
    pub number_of_passengers: u32,
}

impl Passenger {
    pub fn new(id: impl Into<PassengerId>, status: PassengerStatus) -> Self {
        Self {
            id: id.into(),
            name: None,
            status,
            previous_legs: Vec::new(),
            current_leg: None,
            next_legs: Vec::new(),
            number_of_passengers: 1,
        }
    }

    /// Every leg of the trip in travel order.
    pub fn all_legs(&self) -> impl Iterator<Item = &Leg> {
        self.previous_legs
            .iter()
            .chain(self.current_leg.iter())
            .chain(self.next_legs.iter())
    }
}

// ── Stop ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub arrival_time: Timestamp,
    /// `None`: the vehicle stays at this stop indefinitely.
    #[serde(default)]
    pub departure_time: Option<Timestamp>,
    #[serde(default)]
    pub capacity: Option<u32>,
    pub position: GeoPoint,
    #[serde(default)]
    pub label: String,
}

impl Stop {
    pub fn new(arrival_time: Timestamp, departure_time: Option<Timestamp>, position: GeoPoint) -> Self {
        Self { arrival_time, departure_time, capacity: None, position, label: String::new() }
    }

    #[inline]
    pub fn id(&self) -> StopId {
        StopId::from_position(self.position)
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id:     VehicleId,
    #[serde(default)]
    pub mode:   Option<String>,
    pub status: VehicleStatus,
    #[serde(default)]
    pub previous_stops: Vec<Stop>,
    #[serde(default)]
    pub current_stop: Option<Stop>,
    #[serde(default)]
    pub next_stops: Vec<Stop>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Vehicle {
    pub fn new(id: impl Into<VehicleId>, status: VehicleStatus) -> Self {
        Self {
            id: id.into(),
            mode: None,
            status,
            previous_stops: Vec::new(),
            current_stop: None,
            next_stops: Vec::new(),
            capacity: None,
            name: None,
        }
    }

    /// Every stop of the route in visiting order.  Leg stop indices and
    /// polyline indices refer to positions in this sequence.
    pub fn all_stops(&self) -> Vec<&Stop> {
        self.previous_stops
            .iter()
            .chain(self.current_stop.iter())
            .chain(self.next_stops.iter())
            .collect()
    }

    /// Stop at `index` in [`all_stops`](Self::all_stops) order.
    pub fn stop_at(&self, index: usize) -> Option<&Stop> {
        let prev = self.previous_stops.len();
        if index < prev {
            return self.previous_stops.get(index);
        }
        match (&self.current_stop, index - prev) {
            (Some(stop), 0) => Some(stop),
            (Some(_), rest) => self.next_stops.get(rest - 1),
            (None, rest) => self.next_stops.get(rest),
        }
    }
}

/// Collapse consecutive stops that share an arrival time when one of them
/// has no departure: the entry with a real departure wins (the later entry
/// when neither has one).
///
/// Returns `(original_index, stop)` pairs so callers can still look up the
/// polyline arriving at each kept stop.
pub fn dedupe_stops<'a>(stops: &[&'a Stop]) -> Vec<(usize, &'a Stop)> {
    let mut kept: Vec<(usize, &'a Stop)> = Vec::with_capacity(stops.len());
    for (index, &stop) in stops.iter().enumerate() {
        if let Some(last) = kept.last_mut() {
            let prev = last.1;
            let same_arrival = prev.arrival_time == stop.arrival_time;
            if same_arrival && (prev.departure_time.is_none() || stop.departure_time.is_none()) {
                if prev.departure_time.is_none() {
                    *last = (index, stop);
                }
                continue;
            }
        }
        kept.push((index, stop));
    }
    kept
}
