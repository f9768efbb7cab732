//! Fetched simulation states.
//!
//! A `SimulationState` is a full snapshot at `(timestamp, order)` plus the
//! updates the server recorded after it, up to (not including) the next
//! saved snapshot.  States are immutable once stored in the cache.

use std::collections::BTreeMap;

use mmv_core::{Order, PassengerId, Timestamp, VehicleId};

use crate::entity::{Passenger, Vehicle};
use crate::environment::{SimulationEnvironment, build_environment};
use crate::update::{Statistic, Update};
use crate::{ModelError, ModelResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationState {
    pub timestamp:  Timestamp,
    pub order:      Order,
    pub passengers: BTreeMap<PassengerId, Passenger>,
    pub vehicles:   BTreeMap<VehicleId, Vehicle>,
    pub statistic:  Statistic,
    /// Updates after this snapshot, sorted by order.
    pub updates:    Vec<Update>,
}

impl SimulationState {
    pub fn new(timestamp: Timestamp, order: Order) -> Self {
        Self { timestamp, order, ..Self::default() }
    }

    pub fn with_passenger(mut self, passenger: Passenger) -> Self {
        self.passengers.insert(passenger.id.clone(), passenger);
        self
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicles.insert(vehicle.id.clone(), vehicle);
        self
    }

    pub fn with_update(mut self, update: Update) -> Self {
        self.updates.push(update);
        self
    }

    #[inline]
    pub fn last_update(&self) -> Option<&Update> {
        self.updates.last()
    }

    /// Order the next saved state must carry to continue this one without
    /// a gap.
    #[inline]
    pub fn next_order(&self) -> Order {
        self.last_update().map_or(self.order, |u| u.order) + 1
    }

    /// Timestamp of the last known event in this state.
    #[inline]
    pub fn end_timestamp(&self) -> Timestamp {
        self.last_update().map_or(self.timestamp, |u| u.timestamp)
    }

    /// Order of the last known event in this state.
    #[inline]
    pub fn end_order(&self) -> Order {
        self.last_update().map_or(self.order, |u| u.order)
    }

    /// Check the ordering invariants of the snapshot and its updates.
    ///
    /// Update orders must be strictly increasing and above the state order;
    /// update timestamps must be finite, non-decreasing and not earlier than
    /// the state timestamp.
    pub fn validate(&self) -> ModelResult<()> {
        let invalid = |reason: String| ModelError::InvalidState { order: self.order, reason };

        if !self.timestamp.is_finite() {
            return Err(invalid(format!("timestamp {} is not finite", self.timestamp)));
        }

        let mut prev_order = self.order;
        let mut prev_ts = self.timestamp;
        for update in &self.updates {
            if update.order <= prev_order {
                return Err(invalid(format!(
                    "update order {} does not follow {}",
                    update.order, prev_order
                )));
            }
            if !update.timestamp.is_finite() || update.timestamp < prev_ts {
                return Err(invalid(format!(
                    "update {} timestamp {} precedes {}",
                    update.order, update.timestamp, prev_ts
                )));
            }
            prev_order = update.order;
            prev_ts = update.timestamp;
        }
        Ok(())
    }

    /// The snapshot itself, without replaying any update.
    pub fn base_environment(&self) -> SimulationEnvironment {
        SimulationEnvironment {
            timestamp:  self.timestamp,
            order:      self.order,
            passengers: self.passengers.clone(),
            vehicles:   self.vehicles.clone(),
            statistic:  self.statistic.clone(),
        }
    }

    /// Environment at `wanted`, replaying this state's own updates.
    #[inline]
    pub fn environment_at(&self, wanted: Timestamp) -> SimulationEnvironment {
        build_environment(self, &self.updates, wanted)
    }
}
