//! Point-in-time environments and update replay.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use mmv_core::{Order, PassengerId, Timestamp, VehicleId};

use crate::entity::{Passenger, Vehicle};
use crate::state::SimulationState;
use crate::update::{Statistic, Update, UpdateKind};

/// Entities as they stand after the last applied update.
///
/// Maps are ordered so two environments built from the same inputs compare
/// and serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimulationEnvironment {
    /// Timestamp of the last applied update (or of the base state).
    pub timestamp:  Timestamp,
    /// Order of the last applied update (or of the base state).
    pub order:      Order,
    pub passengers: BTreeMap<PassengerId, Passenger>,
    pub vehicles:   BTreeMap<VehicleId, Vehicle>,
    pub statistic:  Statistic,
}

impl SimulationEnvironment {
    /// Apply one update in place.
    ///
    /// Status/legs/stops updates for an entity that does not exist are
    /// skipped with a warning; the environment's timestamp and order still
    /// advance since the update has been consumed.
    pub fn apply(&mut self, update: &Update) {
        self.timestamp = update.timestamp;
        self.order = update.order;

        match &update.kind {
            UpdateKind::CreatePassenger(p) => {
                self.passengers.insert(p.id.clone(), p.clone());
            }
            UpdateKind::UpdatePassengerStatus(u) => match self.passengers.get_mut(&u.id) {
                Some(p) => p.status = u.status,
                None => warn!(order = update.order, passenger = %u.id, "status update for unknown passenger"),
            },
            UpdateKind::UpdatePassengerLegs(u) => match self.passengers.get_mut(&u.id) {
                Some(p) => {
                    p.previous_legs = u.previous_legs.clone();
                    p.current_leg = u.current_leg.clone();
                    p.next_legs = u.next_legs.clone();
                }
                None => warn!(order = update.order, passenger = %u.id, "legs update for unknown passenger"),
            },
            UpdateKind::CreateVehicle(v) => {
                self.vehicles.insert(v.id.clone(), v.clone());
            }
            UpdateKind::UpdateVehicleStatus(u) => match self.vehicles.get_mut(&u.id) {
                Some(v) => v.status = u.status,
                None => warn!(order = update.order, vehicle = %u.id, "status update for unknown vehicle"),
            },
            UpdateKind::UpdateVehicleStops(u) => match self.vehicles.get_mut(&u.id) {
                Some(v) => {
                    v.previous_stops = u.previous_stops.clone();
                    v.current_stop = u.current_stop.clone();
                    v.next_stops = u.next_stops.clone();
                }
                None => warn!(order = update.order, vehicle = %u.id, "stops update for unknown vehicle"),
            },
            UpdateKind::UpdateStatistic(u) => {
                self.statistic = u.statistic.clone();
            }
        }
    }
}

/// Build the environment at `wanted` from `state` and the updates that
/// follow it.
///
/// Updates are replayed in slice order.  Those that do not belong after the
/// state (order ≤ state order, or timestamp before the state) are ignored;
/// replay stops at the first update later than `wanted`.  The result's
/// timestamp and order are those of the last applied update, or the base
/// state's when nothing applied.
///
/// Pure: the state is cloned, never mutated, so repeated calls with the
/// same arguments return equal environments.
pub fn build_environment(
    state: &SimulationState,
    updates: &[Update],
    wanted: Timestamp,
) -> SimulationEnvironment {
    let mut env = state.base_environment();
    for update in updates {
        if update.order <= state.order || update.timestamp < state.timestamp {
            continue;
        }
        if update.timestamp > wanted {
            break;
        }
        env.apply(update);
    }
    env
}
