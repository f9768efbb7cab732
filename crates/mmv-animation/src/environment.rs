//! Animated environment and per-frame sampling.
//!
//! # Sampling order
//!
//! ```text
//! vehicles   → position from their own timeline, dwell stop
//! passengers → onboard ones take their vehicle's position
//! stops      → aggregate vehicles and waiting/dropped-off passengers
//! ```

use std::collections::BTreeMap;

use mmv_core::{
    GeoPoint, PassengerId, PassengerStatus, StopId, Timestamp, VehicleId, VehicleStatus,
};
use mmv_model::{Passenger, Statistic, Vehicle};
use mmv_timeline::{IntervalData, NotDisplayedReason, StopRef, Timeline, Window};

pub type PassengerTimeline = Timeline<PassengerStatus>;
pub type VehicleTimeline = Timeline<VehicleStatus>;

#[derive(Clone, Debug)]
pub struct AnimatedPassenger {
    pub passenger: Passenger,
    pub timeline:  PassengerTimeline,
}

#[derive(Clone, Debug)]
pub struct AnimatedVehicle {
    pub vehicle:  Vehicle,
    pub timeline: VehicleTimeline,
}

/// Static description of a physical stop.
#[derive(Clone, Debug, PartialEq)]
pub struct StopInfo {
    pub label:    String,
    pub position: GeoPoint,
}

/// Timelines for every entity of an environment over one window.
#[derive(Clone, Debug)]
pub struct AnimatedEnvironment {
    pub window:     Window,
    /// Timestamp/order of the snapshot the timelines were built from.
    pub timestamp:  Timestamp,
    pub order:      u64,
    pub statistic:  Statistic,
    pub passengers: BTreeMap<PassengerId, AnimatedPassenger>,
    pub vehicles:   BTreeMap<VehicleId, AnimatedVehicle>,
    pub stops:      BTreeMap<StopId, StopInfo>,
}

// ── Frame ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PassengerFrame {
    pub id:       PassengerId,
    pub status:   PassengerStatus,
    pub position: Option<GeoPoint>,
    /// Vehicle carrying the passenger, when onboard.
    pub vehicle_id: Option<VehicleId>,
    /// Stop the passenger waits at or was dropped off at.
    pub stop:     Option<StopId>,
    pub number_of_passengers: u32,
    pub not_displayed_reason: Option<NotDisplayedReason>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleFrame {
    pub id:       VehicleId,
    pub status:   VehicleStatus,
    pub position: Option<GeoPoint>,
    pub stop:     Option<StopId>,
    pub passenger_ids: Vec<PassengerId>,
    pub number_of_passengers: u32,
    pub not_displayed_reason: Option<NotDisplayedReason>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedStop {
    pub id:            StopId,
    pub label:         String,
    pub position:      GeoPoint,
    pub vehicle_ids:   Vec<VehicleId>,
    pub passenger_ids: Vec<PassengerId>,
    /// Waiting passengers (group sizes summed).
    pub number_of_passengers: u32,
    /// Passengers whose trip ended here (group sizes summed).
    pub number_of_complete_passengers: u32,
}

/// Everything a renderer needs at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub time:       Timestamp,
    pub passengers: BTreeMap<PassengerId, PassengerFrame>,
    pub vehicles:   BTreeMap<VehicleId, VehicleFrame>,
    pub stops:      BTreeMap<StopId, AnimatedStop>,
}

impl Frame {
    /// Entities that cannot be drawn, with their reasons.
    pub fn not_displayed(&self) -> impl Iterator<Item = (&str, NotDisplayedReason)> {
        let p = self
            .passengers
            .values()
            .filter_map(|f| f.not_displayed_reason.map(|r| (f.id.as_str(), r)));
        let v = self
            .vehicles
            .values()
            .filter_map(|f| f.not_displayed_reason.map(|r| (f.id.as_str(), r)));
        p.chain(v)
    }
}

// ── Sampling ──────────────────────────────────────────────────────────────────

impl AnimatedEnvironment {
    /// Resolve a route stop reference to the physical stop id.
    fn stop_id(&self, r: &StopRef) -> Option<StopId> {
        self.vehicles
            .get(&r.vehicle_id)
            .and_then(|v| v.vehicle.stop_at(r.stop_index))
            .map(|s| s.id())
    }

    /// Sample every timeline at `t` (clamped to the window).
    pub fn at(&self, t: Timestamp) -> Frame {
        let t = self.window.clamp(t);

        let mut stops: BTreeMap<StopId, AnimatedStop> = self
            .stops
            .iter()
            .map(|(id, info)| {
                (id.clone(), AnimatedStop {
                    id:            id.clone(),
                    label:         info.label.clone(),
                    position:      info.position,
                    vehicle_ids:   Vec::new(),
                    passenger_ids: Vec::new(),
                    number_of_passengers: 0,
                    number_of_complete_passengers: 0,
                })
            })
            .collect();

        let mut vehicles = BTreeMap::new();
        for (id, animated) in &self.vehicles {
            let iv = animated.timeline.sample(t);
            let stop = match iv.map(|iv| &iv.data) {
                Some(IntervalData::Static { stop: Some(r), .. }) => self.stop_id(r),
                _ => None,
            };
            if let Some(s) = stop.as_ref().and_then(|s| stops.get_mut(s)) {
                s.vehicle_ids.push(id.clone());
            }
            vehicles.insert(id.clone(), VehicleFrame {
                id: id.clone(),
                status: iv.map_or(animated.vehicle.status, |iv| iv.status),
                position: iv.and_then(|iv| iv.position_at(t)),
                stop,
                passenger_ids: Vec::new(),
                number_of_passengers: 0,
                not_displayed_reason: iv.and_then(|iv| iv.not_displayed_reason()),
            });
        }

        let mut passengers = BTreeMap::new();
        for (id, animated) in &self.passengers {
            let iv = animated.timeline.sample(t);
            let group = animated.passenger.number_of_passengers;
            let status = iv.map_or(animated.passenger.status, |iv| iv.status);
            let mut frame = PassengerFrame {
                id: id.clone(),
                status,
                position: None,
                vehicle_id: None,
                stop: None,
                number_of_passengers: group,
                not_displayed_reason: iv.and_then(|iv| iv.not_displayed_reason()),
            };

            match iv.map(|iv| &iv.data) {
                Some(IntervalData::Onboard { vehicle_id }) => {
                    frame.vehicle_id = Some(vehicle_id.clone());
                    if let Some(v) = vehicles.get_mut(vehicle_id) {
                        frame.position = v.position;
                        v.passenger_ids.push(id.clone());
                        v.number_of_passengers += group;
                    }
                }
                Some(IntervalData::Static { position, stop }) => {
                    frame.position = Some(*position);
                    frame.stop = stop.as_ref().and_then(|r| self.stop_id(r));
                    if let Some(s) = frame.stop.as_ref().and_then(|s| stops.get_mut(s)) {
                        s.passenger_ids.push(id.clone());
                        if status == PassengerStatus::Complete {
                            s.number_of_complete_passengers += group;
                        } else {
                            s.number_of_passengers += group;
                        }
                    }
                }
                Some(_) => frame.position = iv.and_then(|iv| iv.position_at(t)),
                None => {}
            }
            passengers.insert(id.clone(), frame);
        }

        Frame { time: t, passengers, vehicles, stops }
    }
}
