//! Ordered simulation update events.
//!
//! On the wire an update is `{ "type": ..., "timestamp": ..., "order": ...,
//! "data": {...} }`; `type`/`data` map onto [`UpdateKind`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mmv_core::{Order, PassengerId, PassengerStatus, Timestamp, VehicleId, VehicleStatus};

use crate::entity::{Leg, Passenger, Stop, Vehicle};

/// Nested statistic table: category → sub-category → metric → value.
pub type Statistic = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PassengerStatusUpdate {
    pub id:     PassengerId,
    pub status: PassengerStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerLegsUpdate {
    pub id: PassengerId,
    #[serde(default)]
    pub previous_legs: Vec<Leg>,
    #[serde(default)]
    pub current_leg: Option<Leg>,
    #[serde(default)]
    pub next_legs: Vec<Leg>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleStatusUpdate {
    pub id:     VehicleId,
    pub status: VehicleStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStopsUpdate {
    pub id: VehicleId,
    #[serde(default)]
    pub previous_stops: Vec<Stop>,
    #[serde(default)]
    pub current_stop: Option<Stop>,
    #[serde(default)]
    pub next_stops: Vec<Stop>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticUpdate {
    pub statistic: Statistic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum UpdateKind {
    CreatePassenger(Passenger),
    UpdatePassengerStatus(PassengerStatusUpdate),
    UpdatePassengerLegs(PassengerLegsUpdate),
    CreateVehicle(Vehicle),
    UpdateVehicleStatus(VehicleStatusUpdate),
    UpdateVehicleStops(VehicleStopsUpdate),
    UpdateStatistic(StatisticUpdate),
}

impl UpdateKind {
    /// Wire name of the update type.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::CreatePassenger(_)       => "createPassenger",
            UpdateKind::UpdatePassengerStatus(_) => "updatePassengerStatus",
            UpdateKind::UpdatePassengerLegs(_)   => "updatePassengerLegs",
            UpdateKind::CreateVehicle(_)         => "createVehicle",
            UpdateKind::UpdateVehicleStatus(_)   => "updateVehicleStatus",
            UpdateKind::UpdateVehicleStops(_)    => "updateVehicleStops",
            UpdateKind::UpdateStatistic(_)       => "updateStatistic",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub timestamp: Timestamp,
    pub order:     Order,
    #[serde(flatten)]
    pub kind:      UpdateKind,
}

impl Update {
    #[inline]
    pub fn new(timestamp: Timestamp, order: Order, kind: UpdateKind) -> Self {
        Self { timestamp, order, kind }
    }

    /// The passenger status this update establishes, if any.
    pub fn passenger_status(&self) -> Option<(&PassengerId, PassengerStatus)> {
        match &self.kind {
            UpdateKind::CreatePassenger(p) => Some((&p.id, p.status)),
            UpdateKind::UpdatePassengerStatus(u) => Some((&u.id, u.status)),
            _ => None,
        }
    }

    /// The vehicle status this update establishes, if any.
    pub fn vehicle_status(&self) -> Option<(&VehicleId, VehicleStatus)> {
        match &self.kind {
            UpdateKind::CreateVehicle(v) => Some((&v.id, v.status)),
            UpdateKind::UpdateVehicleStatus(u) => Some((&u.id, u.status)),
            _ => None,
        }
    }
}
